//! Label settings files
//!
//! Settings load from and save to TOML or RON, picked by file extension.
//! Overlay settings usually sit next to the host's own preferences, so a
//! missing file is not an error for [`Config::load_or_default`].

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// On-disk format of a settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format for `path`, from its extension (case-insensitive)
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_string())),
        }
    }
}

/// Settings that live in a TOML or RON file
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read settings from `path`
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Read settings from `path`, or use defaults when the file does not exist
    fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            log::debug!("No config at '{}', using defaults", path);
            Ok(Self::default())
        }
    }

    /// Write settings to `path`
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Errors reading, writing or checking settings
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File content is not valid for its format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Settings could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path("labels.toml").unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path("prefs/Labels.RON").unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path("labels.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(ConfigFormat::from_path("toml").is_err());
    }
}
