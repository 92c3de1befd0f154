use crate::compiler::{Compiler, EmitMode};
use crate::diagnostics::Diagnostic;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// `class="..."` or `class='...'`
static CLASS_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class\s*=\s*["']([^"']+)["']"#).expect("hard-coded pattern compiles")
});

/// Bracket syntax behind any number of variant segments and an optional `!`
static BRACKET_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[\w-]+:)*)(!?[\w-]+)-\[(.+)\]$").expect("hard-coded pattern compiles")
});

/// Where and how often a class was seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub count: usize,
    pub sources: Vec<String>,
}

/// Combined CSS for a set of documents, plus everything that went wrong along the way.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    /// Newline-joined rules in first-occurrence order
    pub css: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Unique candidate tokens handed to the compiler
    pub tokens: usize,
    /// Tokens that produced a rule
    pub compiled: usize,
}

impl CompileOutput {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// Collects candidate class tokens across documents, keeping first-seen order.
pub struct ClassCollector<'a> {
    compiler: &'a Compiler,
    classes: IndexMap<String, ClassInfo>,
}

impl<'a> ClassCollector<'a> {
    pub fn new(compiler: &'a Compiler) -> Self {
        Self {
            compiler,
            classes: IndexMap::new(),
        }
    }

    /// Scan one comment-stripped document.
    pub fn add_document(&mut self, document: &str, source: &str) {
        for token in class_tokens(document) {
            if !is_candidate(token, self.compiler) {
                continue;
            }
            let info = self.classes.entry(token.to_string()).or_insert_with(|| ClassInfo {
                count: 0,
                sources: Vec::new(),
            });
            info.count += 1;
            if !info.sources.iter().any(|s| s == source) {
                info.sources.push(source.to_string());
            }
        }
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassInfo)> {
        self.classes.iter().map(|(class, info)| (class.as_str(), info))
    }

    /// Compile every collected token, skipping the ones that fail.
    pub fn generate_css(&self) -> CompileOutput {
        let mut output = CompileOutput {
            tokens: self.classes.len(),
            ..Default::default()
        };
        let mut rules = Vec::with_capacity(self.classes.len());

        for (class, info) in &self.classes {
            match self.compiler.compile(class, EmitMode::Rule, &mut output.diagnostics) {
                Some(css) => rules.push(css),
                None if !info.sources.is_empty() => {
                    tracing::debug!("{} skipped, used {} time(s) in {}", class, info.count, info.sources.join(", "));
                }
                None => {}
            }
        }

        output.compiled = rules.len();
        output.css = rules.join("\n");
        tracing::debug!("compiled {} of {} tokens", output.compiled, output.tokens);
        output
    }
}

/// Every whitespace-separated token inside a `class` attribute, in document order.
fn class_tokens(document: &str) -> impl Iterator<Item = &str> {
    CLASS_ATTRIBUTE
        .captures_iter(document)
        .filter_map(|caps| caps.get(1))
        .flat_map(|value| value.as_str().split_whitespace())
}

/// Whether a token is worth compiling: a keyword, bracket syntax, or a
/// registered plugin utility (each optionally behind variants and `!`).
pub fn is_candidate(token: &str, compiler: &Compiler) -> bool {
    let base = token.rsplit(':').next().unwrap_or(token);
    let bare = base.strip_prefix('!').unwrap_or(base);

    compiler.rules().is_keyword(bare)
        || BRACKET_CANDIDATE.is_match(token)
        || compiler.registry().contains(bare)
}

/// Ordered, de-duplicated candidate tokens of one comment-stripped document.
pub fn extract_classes(document: &str, compiler: &Compiler) -> Vec<String> {
    let mut collector = ClassCollector::new(compiler);
    collector.add_document(document, "");
    collector.classes.into_keys().collect()
}

/// Compile the class tokens of every document into one stylesheet.
///
/// A token repeated across documents is emitted once, at its first position.
pub fn generate_css<S: AsRef<str>>(documents: &[S], compiler: &Compiler) -> CompileOutput {
    let mut collector = ClassCollector::new(compiler);
    for (index, document) in documents.iter().enumerate() {
        collector.add_document(document.as_ref(), &format!("document {}", index + 1));
    }
    collector.generate_css()
}
