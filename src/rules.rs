//! The property table: class key -> (validator, declaration generator).

use crate::math::{normalize_calc_expression, normalize_css_math};
use crate::validators::{self, Validator};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

pub const POSITION_VALUES: &[&str] = &["static", "relative", "absolute", "fixed", "sticky"];

pub const DISPLAY_VALUES: &[&str] = &[
    "block",
    "inline",
    "inline-block",
    "flex",
    "grid",
    "hidden",
    "inline-flex",
    "inline-grid",
];

/// Class-key suffix -> physical sides, in emission order.
pub const SPACING_DIRECTIONS: &[(&str, &[&str])] = &[
    ("", &[]),
    ("x", &["left", "right"]),
    ("y", &["top", "bottom"]),
    ("t", &["top"]),
    ("b", &["bottom"]),
    ("l", &["left"]),
    ("r", &["right"]),
];

const SPACING_PROPERTIES: &[(&str, &str)] = &[("p", "padding"), ("m", "margin")];

const SIZE_PROPERTIES: &[(&str, &str)] = &[
    ("w", "width"),
    ("h", "height"),
    ("max-w", "max-width"),
    ("min-w", "min-width"),
    ("max-h", "max-height"),
    ("min-h", "min-height"),
];

const INSET_PROPERTIES: &[&str] = &["top", "left", "right", "bottom"];

static UNITLESS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("hard-coded pattern compiles"));

static BORDER_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d+(\.\d+)?(px|em|rem)?$").expect("hard-coded pattern compiles")
});

static GLOBAL_TABLE: LazyLock<RuleTable> = LazyLock::new(RuleTable::new);

/// How a rule turns an accepted value into declaration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    /// `property: value;` with the value untouched
    Plain { property: &'static str },
    /// Math-normalized everywhere in the value
    Length { property: &'static str },
    /// Math-normalized only when the value starts with a function call
    LeadingMath { property: &'static str },
    /// One declaration per side; unitless numbers get `px`
    Spacing {
        property: &'static str,
        sides: &'static [&'static str],
    },
    Text,
    Background,
    Border,
    Flex,
}

impl Generator {
    pub fn generate(&self, value: &str) -> String {
        match *self {
            Generator::Plain { property } => declaration(property, value),
            Generator::Length { property } => declaration(property, &normalize_css_math(value)),
            Generator::LeadingMath { property } => {
                declaration(property, &normalize_calc_expression(value))
            }
            Generator::Spacing { property, sides } => {
                let mut css_value = normalize_css_math(value);
                if UNITLESS_NUMBER.is_match(&css_value) {
                    css_value.push_str("px");
                }
                if sides.is_empty() {
                    return declaration(property, &css_value);
                }
                sides
                    .iter()
                    .map(|side| declaration(&format!("{}-{}", property, side), &css_value))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            Generator::Text => {
                if validators::color(value) {
                    declaration("color", value)
                } else if validators::text_align(value) {
                    declaration("text-align", value)
                } else if validators::text_transform(value) {
                    declaration("text-transform", value)
                } else {
                    declaration("font-size", &normalize_css_math(value))
                }
            }
            Generator::Background => {
                let lowered = value.trim().to_lowercase();
                let property = if lowered != "none" && validators::color(&lowered) {
                    "background-color"
                } else {
                    "background"
                };
                declaration(property, value)
            }
            Generator::Border => {
                let lowered = value.trim().to_lowercase();
                if BORDER_WIDTH.is_match(&lowered) {
                    declaration("border-width", value)
                } else if validators::border_style(&lowered) {
                    declaration("border-style", value)
                } else if validators::color(value) {
                    declaration("border-color", value)
                } else {
                    declaration("border", &value.replace('_', " "))
                }
            }
            Generator::Flex => declaration("flex", &value.replace('_', " ")),
        }
    }
}

fn declaration(property: &str, value: &str) -> String {
    format!("{}: {};", property, value)
}

/// One entry of the table.
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub key: String,
    validator: Validator,
    generator: Generator,
}

impl StyleRule {
    pub fn new(key: impl Into<String>, validator: Validator, generator: Generator) -> Self {
        Self {
            key: key.into(),
            validator,
            generator,
        }
    }

    pub fn validate(&self, value: &str) -> bool {
        (self.validator)(value)
    }

    pub fn generate(&self, value: &str) -> String {
        self.generator.generate(value)
    }

    pub fn generator(&self) -> Generator {
        self.generator
    }
}

fn always(_: &str) -> bool {
    true
}

/// Immutable lookup table for bracket keys and bare keywords.
///
/// Keywords live in their own map because `flex` is both a display keyword
/// and the key of the `flex-[...]` shorthand rule.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: IndexMap<String, StyleRule>,
    keywords: IndexMap<String, StyleRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        let mut rules = IndexMap::new();
        let mut add = |rule: StyleRule| {
            rules.insert(rule.key.clone(), rule);
        };

        for &(prefix, property) in SPACING_PROPERTIES {
            for &(suffix, sides) in SPACING_DIRECTIONS {
                add(StyleRule::new(
                    format!("{}{}", prefix, suffix),
                    validators::length_or_math,
                    Generator::Spacing { property, sides },
                ));
            }
        }

        for &(key, property) in SIZE_PROPERTIES {
            add(StyleRule::new(key, validators::length_or_math, Generator::Length { property }));
        }
        for &property in INSET_PROPERTIES {
            add(StyleRule::new(property, validators::length_or_math, Generator::Length { property }));
        }

        add(StyleRule::new("text", validators::text, Generator::Text));
        add(StyleRule::new("font", validators::font_weight, Generator::Plain { property: "font-weight" }));
        add(StyleRule::new("lh", validators::line_height, Generator::Plain { property: "line-height" }));
        add(StyleRule::new("bg", validators::background, Generator::Background));
        add(StyleRule::new("d", validators::display, Generator::Plain { property: "display" }));
        add(StyleRule::new("float", validators::float, Generator::Plain { property: "float" }));
        add(StyleRule::new("justify", validators::justify_content, Generator::Plain { property: "justify-content" }));
        add(StyleRule::new("items", validators::align_items, Generator::Plain { property: "align-items" }));
        add(StyleRule::new("gap", validators::length_or_math, Generator::LeadingMath { property: "gap" }));
        add(StyleRule::new("border", validators::border, Generator::Border));
        add(StyleRule::new("radius", validators::length_or_math, Generator::LeadingMath { property: "border-radius" }));
        add(StyleRule::new("pos", validators::position, Generator::Plain { property: "position" }));
        add(StyleRule::new("opacity", validators::opacity, Generator::Plain { property: "opacity" }));
        add(StyleRule::new("z", validators::z_index, Generator::Plain { property: "z-index" }));
        add(StyleRule::new("flex", validators::flex, Generator::Flex));

        let mut keywords = IndexMap::new();
        for &value in POSITION_VALUES {
            keywords.insert(value.to_string(), StyleRule::new(value, always, Generator::Plain { property: "position" }));
        }
        for &value in DISPLAY_VALUES {
            keywords.insert(value.to_string(), StyleRule::new(value, always, Generator::Plain { property: "display" }));
        }

        Self { rules, keywords }
    }

    /// The process-wide table, built on first use.
    pub fn global() -> &'static RuleTable {
        &GLOBAL_TABLE
    }

    /// Rule for a bracket/shorthand property key such as `px` or `bg`
    pub fn get(&self, key: &str) -> Option<&StyleRule> {
        self.rules.get(key)
    }

    /// Rule for a bare keyword class such as `flex` or `absolute`
    pub fn keyword(&self, class: &str) -> Option<&StyleRule> {
        self.keywords.get(class)
    }

    pub fn is_keyword(&self, class: &str) -> bool {
        self.keywords.contains_key(class)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}
