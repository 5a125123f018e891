//! Configuration types for the animset codec.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default file extension, without the leading dot.
pub const DEFAULT_EXTENSION: &str = "animset";

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_indent() -> usize {
    2
}

/// How image paths are stored in the `source` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    /// Stored relative to the directory the file is written to, and resolved
    /// against the directory it is read from.
    #[default]
    RelativeToOutput,
    /// Stored relative to the working directory at encode time, and read
    /// back as written.
    RelativeToWorkingDir,
    /// Stored and read back exactly as the frame spells it.
    Verbatim,
}

/// What to do when a key appears twice in one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the decode.
    Reject,
    /// Keep the later entry.
    LastWins,
}

/// Codec configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Extension appended to file names on encode, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Image path storage profile.
    #[serde(default)]
    pub path_mode: PathMode,
    /// Policy for repeated `image` ids.
    #[serde(default = "DuplicatePolicy::reject")]
    pub duplicate_images: DuplicatePolicy,
    /// Policy for repeated `anim` names.
    #[serde(default = "DuplicatePolicy::last_wins")]
    pub duplicate_animations: DuplicatePolicy,
    /// Spaces per nesting level when writing. 0 writes a single line.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl DuplicatePolicy {
    fn reject() -> Self {
        DuplicatePolicy::Reject
    }

    fn last_wins() -> Self {
        DuplicatePolicy::LastWins
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            path_mode: PathMode::default(),
            duplicate_images: DuplicatePolicy::Reject,
            duplicate_animations: DuplicatePolicy::LastWins,
            indent: default_indent(),
        }
    }
}

impl CodecConfig {
    /// Default configuration with a different path mode.
    pub fn with_path_mode(path_mode: PathMode) -> Self {
        Self {
            path_mode,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        if self
            .extension
            .chars()
            .any(|c| c == '.' || c == '/' || std::path::is_separator(c))
        {
            return Err(ConfigError::InvalidExtension(self.extension.clone()));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("File extension must be non-empty")]
    EmptyExtension,
    #[error("File extension {0:?} must not contain dots or path separators")]
    InvalidExtension(String),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_is_valid() {
        let config = CodecConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extension, "animset");
        assert_eq!(config.path_mode, PathMode::RelativeToOutput);
        assert_eq!(config.duplicate_images, DuplicatePolicy::Reject);
        assert_eq!(config.duplicate_animations, DuplicatePolicy::LastWins);
    }

    #[test]
    fn test_invalid_extension() {
        let mut config = CodecConfig::default();
        config.extension = ".animset".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidExtension(_))
        ));

        config.extension = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyExtension)));
    }

    #[test]
    fn test_json_defaults() {
        let config: CodecConfig = serde_json::from_str(r#"{"path_mode": "verbatim"}"#).unwrap();
        assert_eq!(config.path_mode, PathMode::Verbatim);
        assert_eq!(config.extension, "animset");
        assert_eq!(config.indent, 2);
        assert_eq!(config.duplicate_animations, DuplicatePolicy::LastWins);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");
        fs::write(
            &path,
            r#"{"extension": "anim", "duplicate_animations": "reject", "indent": 0}"#,
        )
        .unwrap();

        let config = CodecConfig::from_json_file(&path).unwrap();
        assert_eq!(config.extension, "anim");
        assert_eq!(config.duplicate_animations, DuplicatePolicy::Reject);
        assert_eq!(config.indent, 0);

        fs::write(&path, r#"{"extension": "a.b"}"#).unwrap();
        assert!(CodecConfig::from_json_file(&path).is_err());
    }
}
