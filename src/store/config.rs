//! Data tree configuration
//!
//! Loaded from a JSON file; every field is optional:
//!
//! ```json
//! { "tree_type": "operational", "log_level": "WARN", "metrics_enabled": true }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Severity};
use crate::schema::TreeType;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration of an `InMemoryDataTree`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTreeConfig {
    /// Tree type; configuration trees validate written values deeply
    #[serde(default)]
    pub tree_type: TreeType,

    /// Minimum severity of the tree's own log lines (default INFO)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    /// Whether counters are recorded (default true)
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> Severity {
    Severity::Info
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for DataTreeConfig {
    fn default() -> Self {
        Self {
            tree_type: TreeType::default(),
            log_level: default_log_level(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl DataTreeConfig {
    /// Default configuration for a configuration tree
    pub fn configuration() -> Self {
        Self::default()
    }

    /// Default configuration for an operational tree
    pub fn operational() -> Self {
        Self {
            tree_type: TreeType::Operational,
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        let source = path.display().to_string();
        let tree_type = config.tree_type.to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", source.as_str()), ("tree_type", tree_type.as_str())],
        );
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = DataTreeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DataTreeConfig::configuration());
        assert_eq!(config.tree_type, TreeType::Configuration);
        assert_eq!(config.log_level, Severity::Info);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tree_type": "operational", "log_level": "WARN", "metrics_enabled": false}}"#
        )
        .unwrap();

        let config = DataTreeConfig::load(file.path()).unwrap();
        assert_eq!(config.tree_type, TreeType::Operational);
        assert_eq!(config.log_level, Severity::Warn);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_missing_file() {
        let err = DataTreeConfig::load(Path::new("/nonexistent/datatree.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_tree_type() {
        let err = DataTreeConfig::from_json_str(r#"{"tree_type": "state"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
