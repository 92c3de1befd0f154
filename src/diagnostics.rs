use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is. Neither level stops compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The token (or config entry) produced no output.
    Warning,
    /// Something looked odd but the result is unaffected.
    Info,
}

/// A single non-fatal problem found while configuring or compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// The class token or config key the message is about, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            token: Some(token.into()),
        }
    }

    pub fn info(message: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            token: Some(token.into()),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Forward this diagnostic to the active `tracing` subscriber.
    pub fn log(&self) {
        match self.severity {
            Severity::Warning => tracing::warn!("{}", self),
            Severity::Info => tracing::info!("{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{}: \"{}\"", self.message, token),
            None => f.write_str(&self.message),
        }
    }
}
