use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// What a plugin utility expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UtilityStyles {
    /// Space-separated class tokens compiled in declarations-only mode
    Compose(String),
    /// Literal `property: value` pairs, emitted in insertion order
    Declarations(IndexMap<String, String>),
}

impl From<&str> for UtilityStyles {
    fn from(tokens: &str) -> Self {
        UtilityStyles::Compose(tokens.to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UtilityStyles {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        UtilityStyles::Declarations(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Breakpoints and pseudo-classes a plugin utility may be combined with.
///
/// The bare utility is always allowed whatever this says.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawVariants", into = "RawVariants")]
pub enum Variants {
    /// `"*"`: every breakpoint and pseudo-class
    All,
    Only(IndexSet<String>),
    #[default]
    None,
}

impl Variants {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: IndexSet<String> = names.into_iter().map(Into::into).collect();
        if names.contains("*") {
            Variants::All
        } else if names.is_empty() {
            Variants::None
        } else {
            Variants::Only(names)
        }
    }

    /// Whether a variant request passes; either a listed breakpoint or a
    /// listed pseudo-class is enough.
    pub fn allows(&self, media: Option<&str>, pseudo: Option<&str>) -> bool {
        match self {
            Variants::All => true,
            Variants::None => false,
            Variants::Only(names) => {
                media.is_some_and(|m| names.contains(m)) || pseudo.is_some_and(|p| names.contains(p))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawVariants {
    One(String),
    Many(Vec<String>),
}

impl From<RawVariants> for Variants {
    fn from(raw: RawVariants) -> Self {
        match raw {
            RawVariants::One(name) => Variants::only([name]),
            RawVariants::Many(names) => Variants::only(names),
        }
    }
}

impl From<Variants> for RawVariants {
    fn from(variants: Variants) -> Self {
        match variants {
            Variants::All => RawVariants::One("*".to_string()),
            Variants::Only(names) => RawVariants::Many(names.into_iter().collect()),
            Variants::None => RawVariants::Many(Vec::new()),
        }
    }
}

/// A registered composite utility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginUtility {
    pub styles: UtilityStyles,
    pub variants: Variants,
}

/// Named composite utilities contributed by plugins.
///
/// Written while a configuration is applied, read-only while compiling.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    utilities: IndexMap<String, PluginUtility>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite every utility in `utilities`, all sharing `variants`.
    ///
    /// A later registration of the same name replaces the earlier one outright;
    /// variant lists are not merged.
    pub fn register<I, K>(&mut self, utilities: I, variants: Variants)
    where
        I: IntoIterator<Item = (K, UtilityStyles)>,
        K: Into<String>,
    {
        for (name, styles) in utilities {
            let name = name.into();
            tracing::trace!("registering plugin utility {}", name);
            self.utilities.insert(
                name,
                PluginUtility {
                    styles,
                    variants: variants.clone(),
                },
            );
        }
    }

    /// Drop every registered utility.
    pub fn reset(&mut self) {
        self.utilities.clear();
    }

    pub fn get(&self, name: &str) -> Option<&PluginUtility> {
        self.utilities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.utilities.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.utilities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.utilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty()
    }
}

/// Something that contributes utilities to a [`PluginRegistry`].
pub trait Plugin {
    fn apply(&self, registry: &mut PluginRegistry);
}

impl<F> Plugin for F
where
    F: Fn(&mut PluginRegistry),
{
    fn apply(&self, registry: &mut PluginRegistry) {
        self(registry)
    }
}

/// A plugin written as data, as found in a config file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityPlugin {
    pub utilities: IndexMap<String, UtilityStyles>,
    pub variants: Variants,
}

impl Plugin for UtilityPlugin {
    fn apply(&self, registry: &mut PluginRegistry) {
        registry.register(self.utilities.clone(), self.variants.clone());
    }
}
