use crate::breakpoints::BreakpointValue;
use crate::errors::{Result, ValcssError};
use crate::registry::UtilityPlugin;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names tried, in order, when no config path is given
pub const CONFIG_CANDIDATES: &[&str] = &[
    "valcss.config.json",
    "valcss.config.yaml",
    "valcss.config.yml",
];

pub const DEFAULT_OUTPUT: &str = "valcss-main.css";

/// valcss configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValcssConfig {
    /// Glob patterns of markup files to scan
    pub files: Vec<String>,

    /// Stylesheet path written in link mode
    #[serde(default = "default_output")]
    pub output: String,

    /// How the CSS reaches the HTML targets
    #[serde(default)]
    pub inject: InjectConfig,

    /// Breakpoint overrides merged over the defaults
    #[serde(default)]
    pub breakpoints: IndexMap<String, BreakpointValue>,

    /// Plugin utilities, applied in order
    #[serde(default)]
    pub plugins: Vec<UtilityPlugin>,
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

impl Default for ValcssConfig {
    fn default() -> Self {
        Self {
            files: vec!["index.html".to_string(), "src/**/*.html".to_string()],
            output: default_output(),
            inject: InjectConfig {
                mode: InjectMode::Link,
                targets: vec!["index.html".to_string()],
            },
            breakpoints: IndexMap::new(),
            plugins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectMode {
    /// `<style>` block inside each target
    Inline,
    /// Separate stylesheet plus a `<link>` tag
    #[default]
    Link,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectConfig {
    pub mode: InjectMode,
    pub targets: Vec<String>,
}

impl ValcssConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = read_config(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ValcssError::ConfigError {
            message: format!("Failed to parse YAML config {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = read_config(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ValcssError::ConfigError {
            message: format!("Failed to parse JSON config {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ValcssError::ConfigError {
                message: format!(
                    "Unsupported config file format: {}. Use .json, .yaml or .yml",
                    path.display()
                ),
            }),
        }
    }

    /// Find the first config candidate present in `dir`.
    pub fn discover(dir: &Path) -> Result<PathBuf> {
        CONFIG_CANDIDATES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ValcssError::ConfigError {
                message: format!(
                    "{} not found in {}. Run 'valcss init' to create a default config.",
                    CONFIG_CANDIDATES.join(" / "),
                    dir.display()
                ),
            })
    }

    /// Load from `explicit` if given, otherwise discover in `dir`.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(Self, PathBuf)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::discover(dir)?,
        };
        let config = Self::from_file(&path)?;
        Ok((config, path))
    }

    /// Structural checks serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(ValcssError::ConfigError {
                message: "'files' must list at least one pattern".to_string(),
            });
        }
        if self.output.trim().is_empty() {
            return Err(ValcssError::ConfigError {
                message: "'output' must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Pretty JSON for `valcss init`
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ValcssError::ConfigError {
        message: format!("Failed to read config file {}: {}", path.display(), e),
    })
}
