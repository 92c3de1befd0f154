use crate::breakpoints::BreakpointTable;
use crate::diagnostics::Diagnostic;

/// Pseudo-classes recognised as modifier segments.
pub const PSEUDO_PREFIXES: &[&str] = &[
    "hover", "focus", "active", "visited", "disabled", "enabled", "empty", "checked",
];

/// A class token split into its modifiers and base.
///
/// ```
/// use valcss::{parse_class, BreakpointTable};
///
/// let (parsed, _) = parse_class("max-lg:focus:!text-[red]", &BreakpointTable::new());
/// assert_eq!(parsed.media_prefix.as_deref(), Some("lg"));
/// assert!(parsed.is_max);
/// assert_eq!(parsed.pseudo.as_deref(), Some("focus"));
/// assert_eq!(parsed.clean_base_class, "text-[red]");
/// assert!(parsed.is_important);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedClass {
    /// Breakpoint name from the first segment, without any `max-`
    pub media_prefix: Option<String>,
    /// `true` for `max-<bp>:` (descending) queries
    pub is_max: bool,
    /// Last pseudo-class segment seen
    pub pseudo: Option<String>,
    /// Final segment as written, including any `!`
    pub base_class: String,
    /// Final segment with the `!` marker removed
    pub clean_base_class: String,
    pub is_important: bool,
}

impl ParsedClass {
    pub fn has_variant(&self) -> bool {
        self.media_prefix.is_some() || self.pseudo.is_some()
    }
}

/// Split a class token into media, pseudo, important and base parts.
///
/// Never fails: anything unrecognised is simply not a modifier. A breakpoint
/// that appears after the first segment is reported as an informational
/// diagnostic and otherwise ignored.
pub fn parse_class(token: &str, breakpoints: &BreakpointTable) -> (ParsedClass, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let parts: Vec<&str> = token.split(':').collect();
    let (base_class, modifiers) = match parts.split_last() {
        Some((base, modifiers)) => (*base, modifiers),
        None => (token, &[][..]),
    };

    let mut media_prefix = None;
    let mut is_max = false;

    if let Some(first) = modifiers.first() {
        match first.strip_prefix("max-") {
            Some(bp) if breakpoints.contains(bp) => {
                media_prefix = Some(bp.to_string());
                is_max = true;
            }
            _ if breakpoints.contains(first) => {
                media_prefix = Some(first.to_string());
            }
            _ => {}
        }
    }

    let mut pseudo = None;
    let skip = usize::from(media_prefix.is_some());
    for (index, part) in modifiers.iter().enumerate().skip(skip) {
        if index > 0 && looks_like_media(part, breakpoints) {
            diagnostics.push(Diagnostic::info(
                format!("Media prefix \"{}\" must appear only as the first segment", part),
                token,
            ));
        }
        if PSEUDO_PREFIXES.contains(part) {
            pseudo = Some(part.to_string());
        }
    }

    let (is_important, clean_base_class) = match base_class.strip_prefix('!') {
        Some(clean) => (true, clean.to_string()),
        None => (false, base_class.to_string()),
    };

    let parsed = ParsedClass {
        media_prefix,
        is_max,
        pseudo,
        base_class: base_class.to_string(),
        clean_base_class,
        is_important,
    };
    (parsed, diagnostics)
}

fn looks_like_media(part: &str, breakpoints: &BreakpointTable) -> bool {
    breakpoints.contains(part) || part.starts_with("max-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(token: &str) -> (ParsedClass, Vec<Diagnostic>) {
        parse_class(token, &BreakpointTable::new())
    }

    #[test]
    fn test_media_and_pseudo() {
        let (parsed, diagnostics) = parse("md:hover:p-[10px]");
        assert_eq!(
            parsed,
            ParsedClass {
                media_prefix: Some("md".to_string()),
                is_max: false,
                pseudo: Some("hover".to_string()),
                base_class: "p-[10px]".to_string(),
                clean_base_class: "p-[10px]".to_string(),
                is_important: false,
            }
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_max_prefix_and_important() {
        let (parsed, _) = parse("max-lg:focus:!text-red-500");
        assert_eq!(parsed.media_prefix.as_deref(), Some("lg"));
        assert!(parsed.is_max);
        assert_eq!(parsed.pseudo.as_deref(), Some("focus"));
        assert_eq!(parsed.base_class, "!text-red-500");
        assert_eq!(parsed.clean_base_class, "text-red-500");
        assert!(parsed.is_important);
    }

    #[test]
    fn test_unknown_max_is_not_media() {
        let (parsed, _) = parse("max-tablet:p-[1px]");
        assert_eq!(parsed.media_prefix, None);
        assert!(!parsed.is_max);
    }

    #[test]
    fn test_last_pseudo_wins() {
        let (parsed, diagnostics) = parse("hover:focus:active:flex");
        assert_eq!(parsed.pseudo.as_deref(), Some("active"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_misplaced_media_is_informational() {
        let (parsed, diagnostics) = parse("hover:md:flex");
        assert_eq!(parsed.media_prefix, None);
        assert_eq!(parsed.pseudo.as_deref(), Some("hover"));
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_warning());
        assert!(diagnostics[0].message.contains("first segment"));
    }

    #[test]
    fn test_media_only_in_first_segment() {
        let (parsed, diagnostics) = parse("md:lg:block");
        assert_eq!(parsed.media_prefix.as_deref(), Some("md"));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_plain_token() {
        let (parsed, diagnostics) = parse("block");
        assert_eq!(parsed.base_class, "block");
        assert_eq!(parsed.clean_base_class, "block");
        assert!(!parsed.has_variant());
        assert!(!parsed.is_important);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_breakpoint_name_alone_is_base() {
        let (parsed, _) = parse("md");
        assert_eq!(parsed.media_prefix, None);
        assert_eq!(parsed.clean_base_class, "md");
    }

    #[test]
    fn test_malformed_degrades() {
        let (parsed, _) = parse(":::");
        assert!(!parsed.has_variant());
        assert_eq!(parsed.base_class, "");

        let (parsed, _) = parse("");
        assert_eq!(parsed.clean_base_class, "");
    }

    #[test]
    fn test_custom_breakpoint_table() {
        let mut overrides = indexmap::IndexMap::new();
        overrides.insert(
            "tablet".to_string(),
            crate::breakpoints::BreakpointValue::Pixels(900),
        );
        let (table, _) = BreakpointTable::with_overrides(&overrides);
        let (parsed, _) = parse_class("max-tablet:p-[1px]", &table);
        assert_eq!(parsed.media_prefix.as_deref(), Some("tablet"));
        assert!(parsed.is_max);
    }
}
