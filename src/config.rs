//! Dispatcher configuration with RON-based save/load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "chat_commands.ron";

fn default_prefix() -> String {
    "!".to_string()
}

/// Dispatcher configuration.
///
/// Every field has a default, so a config file only needs to name the
/// fields it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    /// Text a line must start with to be treated as a command.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Whether the prefix must match with exact case.
    #[serde(default)]
    pub case_sensitive_prefix: bool,
    /// Whether command names and aliases must match with exact case.
    #[serde(default)]
    pub case_sensitive_commands: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            case_sensitive_prefix: false,
            case_sensitive_commands: false,
        }
    }
}

impl ChatConfig {
    /// Create a config with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;

        ron::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Save config to a RON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(parent.display().to_string(), e.to_string()))?;
        }

        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);

        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))
    }

    /// Load config from file, returning defaults if the file doesn't exist
    /// or doesn't parse.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

/// Errors that can occur during config operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error (path, message).
    Io(String, String),
    /// Parse error (path, message).
    Parse(String, String),
    /// Serialization error.
    Serialize(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, msg) => write!(f, "IO error for '{}': {}", path, msg),
            ConfigError::Parse(path, msg) => write!(f, "Parse error for '{}': {}", path, msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.prefix, "!");
        assert!(!config.case_sensitive_prefix);
        assert!(!config.case_sensitive_commands);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = ChatConfig {
            prefix: "cc ".to_string(),
            case_sensitive_prefix: true,
            case_sensitive_commands: true,
        };

        let temp = NamedTempFile::new().unwrap();
        config.save(temp.path()).unwrap();

        let loaded = ChatConfig::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing() {
        assert!(ChatConfig::load("nonexistent_file.ron").is_err());
    }

    #[test]
    fn test_config_load_or_default() {
        let config = ChatConfig::load_or_default("nonexistent_file.ron");
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let ron_content = r#"(
    prefix: "/",
)"#;

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(ron_content.as_bytes()).unwrap();
        temp.flush().unwrap();

        let config = ChatConfig::load(temp.path()).unwrap();
        assert_eq!(config.prefix, "/");
        assert!(!config.case_sensitive_prefix);
        assert!(!config.case_sensitive_commands);
    }
}
