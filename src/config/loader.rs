//! Configuration loading from disk.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The path does not resolve to a readable file.
    #[error("config file {} not found or unreadable: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file extension does not map to a known format.
    #[error("unsupported config format {extension:?} for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The content does not decode into the expected shape.
    #[error("failed to parse {}: {details}", .path.display())]
    Parse { path: PathBuf, details: String },

    /// The content decoded but failed semantic validation.
    #[error("invalid config {}: {}", .path.display(), join(.errors))]
    Invalid {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Supported on-disk formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format for `path` from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => f.write_str("yaml"),
            ConfigFormat::Toml => f.write_str("toml"),
            ConfigFormat::Json => f.write_str("json"),
        }
    }
}

/// Decode and validate configuration text.
///
/// `origin` is only used to label errors. Blank input decodes to the
/// defaults, which then fail validation on the missing port.
pub fn parse_config(content: &str, format: ConfigFormat, origin: &Path) -> Result<Config, ConfigError> {
    let parse_error = |details: String| ConfigError::Parse {
        path: origin.to_path_buf(),
        details,
    };

    let config = if content.trim().is_empty() {
        Config::default()
    } else {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        }
    };

    validate_config(&config).map_err(|errors| ConfigError::Invalid {
        path: origin.to_path_buf(),
        errors,
    })?;

    Ok(config)
}

/// Load and validate configuration from a file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })?;

    let content = fs::read_to_string(path).map_err(|source| ConfigError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), format = %format, bytes = content.len(), "Read config file");
    parse_config(&content, format, path)
}
