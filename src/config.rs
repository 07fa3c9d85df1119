//! Data source configuration
//!
//! Loaded from JSON. Every field is optional:
//!
//! ```json
//! { "auto_increment": true, "id_type": "INT", "string_id_length": 16 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datasource::{IdType, DEFAULT_STRING_ID_LENGTH};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Id policy settings of a [`DataSource`](crate::datasource::DataSource)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Assign ids on insert (default: true)
    #[serde(default = "default_auto_increment")]
    pub auto_increment: bool,

    /// Id policy used when assigning (default: INT)
    #[serde(default)]
    pub id_type: IdType,

    /// Length of STR ids (default: 16)
    #[serde(default = "default_string_id_length")]
    pub string_id_length: usize,
}

fn default_auto_increment() -> bool {
    true
}

fn default_string_id_length() -> usize {
    DEFAULT_STRING_ID_LENGTH
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            auto_increment: default_auto_increment(),
            id_type: IdType::default(),
            string_id_length: default_string_id_length(),
        }
    }
}

impl DataSourceConfig {
    /// Config assigning ids of the given policy
    pub fn auto(id_type: IdType) -> Self {
        Self {
            id_type,
            ..Self::default()
        }
    }

    /// Config requiring callers to supply ids
    pub fn manual_ids() -> Self {
        Self {
            auto_increment: false,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: DataSourceConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Validate settings
    pub fn validate(&self) -> ConfigResult<()> {
        if self.id_type == IdType::Str && self.string_id_length == 0 {
            return Err(ConfigError::Invalid(
                "string_id_length must be > 0 for STR ids".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DataSourceConfig::default();
        assert!(config.auto_increment);
        assert_eq!(config.id_type, IdType::Int);
        assert_eq!(config.string_id_length, 16);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(
            DataSourceConfig::from_json_str("{}").unwrap(),
            DataSourceConfig::default()
        );
    }

    #[test]
    fn test_parse_fields() {
        let config = DataSourceConfig::from_json_str(
            r#"{"auto_increment": false, "id_type": "UUID", "string_id_length": 8}"#,
        )
        .unwrap();
        assert!(!config.auto_increment);
        assert_eq!(config.id_type, IdType::Uuid);
        assert_eq!(config.string_id_length, 8);
    }

    #[test]
    fn test_unknown_id_type_rejected() {
        let err = DataSourceConfig::from_json_str(r#"{"id_type": "FLOAT"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_string_length_rejected() {
        let err =
            DataSourceConfig::from_json_str(r#"{"id_type": "STR", "string_id_length": 0}"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, r#"{"id_type": "STR"}"#).unwrap();
        let config = DataSourceConfig::load(&path).unwrap();
        assert_eq!(config.id_type, IdType::Str);

        let err = DataSourceConfig::load(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
