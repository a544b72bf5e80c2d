use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub latex: LatexConfig,
    pub html: HtmlConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LatexConfig {
    /// Environment wrapped around aligned-equation blocks
    pub environment: String,
    pub standalone: bool,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            environment: "align*".to_string(),
            standalone: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// CSS colour for math that fails to render
    pub error_color: String,
    pub standalone: bool,
    pub title: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            error_color: "#EF4444".to_string(),
            standalone: false,
            title: "Solution".to_string(),
        }
    }
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        // validated by build.rs
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return the compiled defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::compiled_default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
