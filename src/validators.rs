//! Predicates over raw bracket values, one per CSS value domain.
//!
//! Every validator is total: it takes any string and answers yes or no.

use regex::Regex;
use std::sync::LazyLock;

/// Signature shared by all validators so rules can store them as plain function pointers.
pub type Validator = fn(&str) -> bool;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("hard-coded pattern compiles"));
    };
}

pattern!(LENGTH, r"^-?\d+(\.\d+)?(px|em|rem|%|vh|vw)?$");
pattern!(CALC, r"^calc\(.+\)$");
pattern!(CLAMP, r"^clamp\(.+\)$");
pattern!(MIN, r"^min\(.+\)$");
pattern!(MAX, r"^max\(.+\)$");
pattern!(HEX, r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$");
pattern!(RGB, r"^rgb\((\s*\d{1,3}\s*,){2}\s*\d{1,3}\s*\)$");
pattern!(RGBA, r"^rgba\((\s*\d{1,3}\s*,){3}\s*(0|1|0?\.\d+)\)$");
pattern!(NAMED_COLOR, r"^(transparent|[a-zA-Z]+)$");
pattern!(FONT_WEIGHT, r"^(100|200|300|400|500|600|700|800|900)$");
pattern!(INTEGER, r"^-?\d+$");
pattern!(OPACITY, r"^(0(\.\d+)?|1(\.0+)?)$");
pattern!(FLEX_PART, r"^(\d+(\.\d+)?(px|em|rem|%|vh|vw)?|auto|content)$");

pub const BORDER_STYLES: &[&str] = &[
    "none", "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];

pub fn length(val: &str) -> bool {
    LENGTH.is_match(val)
}

/// `calc()`, `clamp()`, `min()` or `max()` wrapping the whole value
pub fn math_function(val: &str) -> bool {
    CALC.is_match(val) || CLAMP.is_match(val) || MIN.is_match(val) || MAX.is_match(val)
}

pub fn length_or_math(val: &str) -> bool {
    length(val) || math_function(val)
}

pub fn color(val: &str) -> bool {
    HEX.is_match(val) || RGB.is_match(val) || RGBA.is_match(val) || NAMED_COLOR.is_match(val)
}

pub fn font_weight(val: &str) -> bool {
    FONT_WEIGHT.is_match(val)
}

pub fn line_height(val: &str) -> bool {
    INTEGER.is_match(val) || val == "normal"
}

pub fn text_align(val: &str) -> bool {
    matches!(val, "left" | "right" | "center" | "justify")
}

pub fn text_transform(val: &str) -> bool {
    matches!(val, "uppercase" | "lowercase" | "capitalize" | "none")
}

/// Anything the `text` rule can turn into a declaration
pub fn text(val: &str) -> bool {
    color(val) || length_or_math(val) || text_align(val) || text_transform(val)
}

pub fn display(val: &str) -> bool {
    matches!(
        val,
        "block" | "inline" | "inline-block" | "flex" | "grid" | "none" | "inline-flex" | "inline-grid"
    )
}

pub fn justify_content(val: &str) -> bool {
    matches!(
        val,
        "flex-start" | "flex-end" | "center" | "space-between" | "space-around" | "space-evenly"
    )
}

pub fn align_items(val: &str) -> bool {
    matches!(val, "stretch" | "flex-start" | "flex-end" | "center" | "baseline")
}

/// Decimal in `[0, 1]`
pub fn opacity(val: &str) -> bool {
    OPACITY.is_match(val)
}

pub fn z_index(val: &str) -> bool {
    INTEGER.is_match(val)
}

pub fn position(val: &str) -> bool {
    matches!(val, "static" | "relative" | "absolute" | "fixed" | "sticky")
}

pub fn float(val: &str) -> bool {
    matches!(val, "left" | "right" | "none")
}

pub fn border_style(val: &str) -> bool {
    BORDER_STYLES.contains(&val)
}

/// Every `_`-separated part must be a width, a style keyword or a color.
pub fn border(val: &str) -> bool {
    let lowered = val.trim().to_lowercase();
    lowered
        .split('_')
        .all(|part| length(part) || border_style(part) || color(part))
}

/// Colors plus the `none` keyword.
pub fn background(val: &str) -> bool {
    let lowered = val.trim().to_lowercase();
    lowered == "none" || color(&lowered)
}

/// `flex` shorthand: a keyword, or up to three `_`-separated grow/shrink/basis parts.
pub fn flex(val: &str) -> bool {
    if matches!(val, "none" | "auto" | "initial") {
        return true;
    }
    let parts: Vec<&str> = val.split('_').collect();
    parts.len() <= 3 && parts.iter().all(|part| FLEX_PART.is_match(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_or_math() {
        assert!(length_or_math("10px"));
        assert!(length_or_math("-1.5rem"));
        assert!(length_or_math("50%"));
        assert!(length_or_math("10"));
        assert!(length_or_math("calc(100%_-_10px)"));
        assert!(length_or_math("clamp(1rem,2vw,3rem)"));
        assert!(length_or_math("min(10px,5vw)"));
        assert!(length_or_math("max(10px,5vw)"));

        assert!(!length_or_math("10pt"));
        assert!(!length_or_math("abc"));
        assert!(!length_or_math("calc()"));
        assert!(!length_or_math(""));
    }

    #[test]
    fn test_color() {
        assert!(color("#fff"));
        assert!(color("#A1B2C3"));
        assert!(color("rgb(1, 2, 3)"));
        assert!(color("rgba(1,2,3,0.5)"));
        assert!(color("red"));
        assert!(color("transparent"));

        assert!(!color("#ffff"));
        assert!(!color("rgb(1,2)"));
        assert!(!color("red-500"));
    }

    #[test]
    fn test_keyword_domains() {
        assert!(font_weight("700"));
        assert!(!font_weight("750"));
        assert!(line_height("2"));
        assert!(line_height("normal"));
        assert!(!line_height("1.5"));
        assert!(text_align("center"));
        assert!(text_transform("uppercase"));
        assert!(display("inline-grid"));
        assert!(!display("table"));
        assert!(justify_content("space-between"));
        assert!(align_items("baseline"));
        assert!(position("sticky"));
        assert!(float("none"));
        assert!(!float("center"));
    }

    #[test]
    fn test_opacity_bounds() {
        assert!(opacity("0"));
        assert!(opacity("0.25"));
        assert!(opacity("1"));
        assert!(opacity("1.0"));
        assert!(!opacity("1.5"));
        assert!(!opacity("2"));
        assert!(!opacity("-0.5"));
    }

    #[test]
    fn test_z_index_signed() {
        assert!(z_index("10"));
        assert!(z_index("-1"));
        assert!(!z_index("1.5"));
        assert!(!z_index("auto"));
    }

    #[test]
    fn test_border_compound() {
        assert!(border("1px"));
        assert!(border("1px_solid_red"));
        assert!(border("2px_dashed_#ff0000"));
        assert!(border("SOLID"));
        assert!(!border("1px_solid_red-500"));
        assert!(!border("1px__red"));
    }

    #[test]
    fn test_background() {
        assert!(background("none"));
        assert!(background("#fff"));
        assert!(background("Red"));
        assert!(!background("url(a.png)"));
    }

    #[test]
    fn test_flex() {
        assert!(flex("1"));
        assert!(flex("1_1_0%"));
        assert!(flex("none"));
        assert!(!flex("1_1_1_1"));
        assert!(!flex("grow"));
    }
}
