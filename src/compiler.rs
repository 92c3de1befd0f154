use crate::breakpoints::{BreakpointTable, BreakpointValue};
use crate::diagnostics::Diagnostic;
use crate::parser::{parse_class, ParsedClass};
use crate::registry::{Plugin, PluginRegistry, PluginUtility, UtilityStyles, Variants};
use crate::rules::{RuleTable, StyleRule};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// `property-[value]`
static BRACKET_SYNTAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]+)-\[(.+)\]$").expect("hard-coded pattern compiles"));

/// What [`Compiler::compile`] should return for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// A full rule, media-wrapped when the token asks for a breakpoint
    Rule,
    /// Only the declaration text, used when composing plugin utilities
    Declarations,
}

/// Result of compiling a single token on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledClass {
    pub css: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compilation context: breakpoints, the shared rule table and the plugin registry.
///
/// Each instance is independent, so separate runs (or tests) never share
/// registered utilities.
#[derive(Debug, Clone)]
pub struct Compiler {
    breakpoints: BreakpointTable,
    rules: &'static RuleTable,
    registry: PluginRegistry,
}

impl Compiler {
    /// Default breakpoints, empty registry
    pub fn new() -> Self {
        Self::with_breakpoints(BreakpointTable::new())
    }

    pub fn with_breakpoints(breakpoints: BreakpointTable) -> Self {
        Self {
            breakpoints,
            rules: RuleTable::global(),
            registry: PluginRegistry::new(),
        }
    }

    /// Rebuild breakpoints from `overrides` and replay `plugins` into a freshly
    /// reset registry. Returns the breakpoint warnings.
    pub fn reconfigure<'a, P, I>(
        &mut self,
        overrides: &IndexMap<String, BreakpointValue>,
        plugins: I,
    ) -> Vec<Diagnostic>
    where
        P: Plugin + ?Sized + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let (breakpoints, diagnostics) = BreakpointTable::with_overrides(overrides);
        self.breakpoints = breakpoints;
        self.apply_plugins(plugins);
        diagnostics
    }

    /// Reset the registry, then let each plugin register its utilities in order.
    pub fn apply_plugins<'a, P, I>(&mut self, plugins: I)
    where
        P: Plugin + ?Sized + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        self.registry.reset();
        for plugin in plugins {
            plugin.apply(&mut self.registry);
        }
        tracing::debug!("{} plugin utilities registered", self.registry.len());
    }

    /// Register utilities directly, outside of any plugin.
    pub fn register<I, K>(&mut self, utilities: I, variants: Variants)
    where
        I: IntoIterator<Item = (K, UtilityStyles)>,
        K: Into<String>,
    {
        self.registry.register(utilities, variants);
    }

    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.breakpoints
    }

    pub fn rules(&self) -> &RuleTable {
        self.rules
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Compile one token, collecting its diagnostics separately.
    pub fn compile_class(&self, token: &str) -> CompiledClass {
        let mut diagnostics = Vec::new();
        let css = self.compile(token, EmitMode::Rule, &mut diagnostics);
        CompiledClass { css, diagnostics }
    }

    /// Compile one token into CSS text.
    ///
    /// Returns `None` (plus a warning in `diagnostics`) when the token cannot
    /// be resolved, its value is rejected, or it asks for a variant a plugin
    /// utility does not allow.
    pub fn compile(
        &self,
        token: &str,
        mode: EmitMode,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<String> {
        let mut expanding = Vec::new();
        self.compile_with_stack(token, mode, diagnostics, &mut expanding)
    }

    fn compile_with_stack(
        &self,
        token: &str,
        mode: EmitMode,
        diagnostics: &mut Vec<Diagnostic>,
        expanding: &mut Vec<String>,
    ) -> Option<String> {
        let (parsed, parse_diagnostics) = parse_class(token, &self.breakpoints);
        diagnostics.extend(parse_diagnostics);

        if let Some(utility) = self.registry.get(&parsed.clean_base_class) {
            return self.emit_utility(token, &parsed, utility, mode, diagnostics, expanding);
        }

        let Some((rule, value)) = self.resolve_rule(&parsed.clean_base_class) else {
            diagnostics.push(Diagnostic::warning("Unknown class", token));
            return None;
        };

        if !rule.validate(value) {
            diagnostics.push(Diagnostic::warning("Invalid class or value", token));
            return None;
        }

        let mut body = rule.generate(value);
        if parsed.is_important {
            body = mark_important(&body);
        }
        tracing::trace!("{} resolved through rule {}", token, rule.key);

        match mode {
            EmitMode::Declarations => Some(body),
            EmitMode::Rule => Some(self.wrap_rule(token, &parsed, &body)),
        }
    }

    /// Find the rule for a clean base class, and the value to feed it.
    ///
    /// Keywords first, then `key-[value]`, then the bare `key-value` shorthand.
    fn resolve_rule<'c>(&self, class: &'c str) -> Option<(&StyleRule, &'c str)> {
        if let Some(rule) = self.rules.keyword(class) {
            return Some((rule, class));
        }

        if let Some(caps) = BRACKET_SYNTAX.captures(class) {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            return self.rules.get(key).map(|rule| (rule, value));
        }

        class
            .match_indices('-')
            .map(|(i, _)| (&class[..i], &class[i + 1..]))
            .filter(|(_, value)| !value.is_empty())
            .find_map(|(key, value)| self.rules.get(key).map(|rule| (rule, value)))
    }

    fn emit_utility(
        &self,
        token: &str,
        parsed: &ParsedClass,
        utility: &PluginUtility,
        mode: EmitMode,
        diagnostics: &mut Vec<Diagnostic>,
        expanding: &mut Vec<String>,
    ) -> Option<String> {
        if parsed.has_variant()
            && !utility
                .variants
                .allows(parsed.media_prefix.as_deref(), parsed.pseudo.as_deref())
        {
            diagnostics.push(Diagnostic::warning("Variant not allowed", token));
            return None;
        }

        let body = match &utility.styles {
            UtilityStyles::Declarations(declarations) => declarations
                .iter()
                .map(|(property, value)| format!("{}: {};", property, value))
                .collect::<Vec<_>>()
                .join(" "),
            UtilityStyles::Compose(tokens) => {
                let name = &parsed.clean_base_class;
                if expanding.contains(name) {
                    diagnostics.push(Diagnostic::warning(
                        format!("Plugin utility \"{}\" composes itself", name),
                        token,
                    ));
                    return None;
                }
                expanding.push(name.clone());
                let parts: Vec<String> = tokens
                    .split_whitespace()
                    .filter_map(|part| {
                        self.compile_with_stack(part, EmitMode::Declarations, diagnostics, expanding)
                    })
                    .collect();
                expanding.pop();
                parts.join(" ")
            }
        };

        if body.is_empty() {
            diagnostics.push(Diagnostic::warning("Plugin utility produced no declarations", token));
            return None;
        }

        match mode {
            EmitMode::Declarations => Some(body),
            EmitMode::Rule => Some(self.wrap_rule(token, parsed, &body)),
        }
    }

    /// `.selector[:pseudo] { body }`, inside a media query when requested.
    fn wrap_rule(&self, token: &str, parsed: &ParsedClass, body: &str) -> String {
        let mut selector = format!(".{}", escape_class(token));
        if let Some(pseudo) = &parsed.pseudo {
            selector.push(':');
            selector.push_str(pseudo);
        }
        let rule = format!("{} {{ {} }}", selector, body);

        let width = parsed
            .media_prefix
            .as_deref()
            .and_then(|name| self.breakpoints.get(name));
        match width {
            Some(px) => format!("{} {{\n  {}\n}}", media_query(px, parsed.is_max), rule),
            None => rule,
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

fn media_query(px: u32, is_max: bool) -> String {
    if is_max {
        format!("@media (max-width: {}px)", i64::from(px) - 1)
    } else {
        format!("@media (min-width: {}px)", px)
    }
}

/// Backslash-escape every character that is special in a CSS class selector.
///
/// ```
/// assert_eq!(valcss::escape_class("md:p-[10px]"), r"md\:p-\[10px\]");
/// ```
pub fn escape_class(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len() + 8);
    for ch in class.chars() {
        if matches!(
            ch,
            ' ' | '!' | '"' | '#' | '$' | '%' | '&' | '\'' | '(' | ')' | '*' | '+' | ','
                | '.' | '/' | ':' | ';' | '<' | '=' | '>' | '?' | '@' | '[' | '\\' | ']'
                | '^' | '`' | '{' | '|' | '}' | '~'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Replace the trailing `;` of generated declaration text with ` !important;`.
///
/// Only the final declaration is marked.
fn mark_important(body: &str) -> String {
    format!("{} !important;", body.strip_suffix(';').unwrap_or(body))
}
