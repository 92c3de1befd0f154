use thiserror::Error;

/// Main error type for the valcss crate.
///
/// Only configuration loading and file I/O end up here. A bad class token is
/// never an error; it becomes a [`crate::Diagnostic`] instead.
#[derive(Debug, Error)]
pub enum ValcssError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Failed to read input file {path}: {message}")]
    InputError { path: String, message: String },

    #[error("Failed to write output to {path}: {message}")]
    OutputError { path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ValcssError>;
