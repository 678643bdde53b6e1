//! Configuration loading
//!
//! The configuration file lives in the directory the tool is run from, next
//! to the environment directories it produces.

use crate::error::{ConfigError, Result};
use crate::model::LabConfig;
use std::path::Path;
use tracing::debug;

/// File name the declarative configuration is read from.
pub const CONFIG_FILE_NAME: &str = "labstack.yaml";

const SAMPLE_CONFIG: &str = include_str!("resources/labstack.yaml");

/// The embedded starter configuration, printed by `labstack sample`.
pub fn sample_config() -> &'static str {
    SAMPLE_CONFIG
}

/// Load and parse the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<LabConfig> {
    if !path.is_file() {
        return Err(ConfigError::ConfigFileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config: LabConfig = serde_yaml::from_str(&content)?;
    debug!(
        roles = config.roles.len(),
        subnets = config.subnets.len(),
        "Loaded configuration"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: LabConfig = serde_yaml::from_str(sample_config()).unwrap();
        assert_eq!(config.region, "us-east-1");
        assert!(config.roles.contains_key("web"));
        assert_eq!(config.subnets.len(), 1);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileNotFound { .. }));
    }

    #[test]
    fn test_load_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, sample_config()).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.subnets[0].servers[0].private_ip_suffixes, vec![1, 2]);
    }

    #[test]
    fn test_load_config_rejects_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "region: [unclosed").unwrap();

        assert!(matches!(
            load_config(&path).unwrap_err(),
            ConfigError::Yaml(_)
        ));
    }
}
