use crate::diagnostics::Diagnostic;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default breakpoints, in pixels.
pub const DEFAULT_BREAKPOINTS: &[(&str, u32)] = &[
    ("xs", 480),
    ("sm", 640),
    ("md", 768),
    ("lg", 1024),
    ("xl", 1280),
    ("xxl", 1536),
];

/// A breakpoint override as written in a config file: `990`, `"990"` or `"990px"`.
///
/// Any other JSON/YAML value still deserializes (as `Fractional` or `Other`) so that
/// a bad entry becomes a warning instead of a config parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BreakpointValue {
    Pixels(i64),
    Fractional(f64),
    Text(String),
    Other(serde_json::Value),
}

impl BreakpointValue {
    /// Pixel width this value denotes, or `None` when it is not a usable width.
    pub fn to_pixels(&self) -> Option<u32> {
        match self {
            BreakpointValue::Pixels(px) => u32::try_from(*px).ok(),
            // Truncated toward zero: `990.5` is 990.
            BreakpointValue::Fractional(px) if px.is_finite() => u32::try_from(px.trunc() as i64).ok(),
            BreakpointValue::Fractional(_) | BreakpointValue::Other(_) => None,
            BreakpointValue::Text(text) => {
                let text = text.trim();
                let digits = text.strip_suffix("px").unwrap_or(text).trim();
                digits.parse::<u32>().ok()
            }
        }
    }
}

impl std::fmt::Display for BreakpointValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakpointValue::Pixels(px) => write!(f, "{}", px),
            BreakpointValue::Fractional(px) => write!(f, "{}", px),
            BreakpointValue::Text(text) => write!(f, "\"{}\"", text),
            BreakpointValue::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Named minimum widths used to build media queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointTable {
    widths: IndexMap<String, u32>,
}

impl BreakpointTable {
    /// Table holding only the default breakpoints
    pub fn new() -> Self {
        Self {
            widths: DEFAULT_BREAKPOINTS
                .iter()
                .map(|(name, px)| (name.to_string(), *px))
                .collect(),
        }
    }

    /// Merge user overrides on top of the defaults.
    ///
    /// Entries that do not denote a pixel width are dropped and the default (if
    /// there is one) is kept; each dropped entry yields a warning.
    pub fn with_overrides(overrides: &IndexMap<String, BreakpointValue>) -> (Self, Vec<Diagnostic>) {
        let mut table = Self::new();
        let mut diagnostics = Vec::new();

        for (name, value) in overrides {
            match value.to_pixels() {
                Some(px) => {
                    table.widths.insert(name.clone(), px);
                }
                None => {
                    let fallback = match table.get(name) {
                        Some(px) => format!("using default value {}px instead", px),
                        None => "breakpoint ignored".to_string(),
                    };
                    diagnostics.push(Diagnostic::warning(
                        format!("Invalid breakpoint value {}, {}", value, fallback),
                        name.clone(),
                    ));
                }
            }
        }

        (table, diagnostics)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.widths.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.widths.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.widths.iter().map(|(name, px)| (name.as_str(), *px))
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::new()
    }
}
