use crate::config::HydraConfig;
use crate::error::{HydraError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// TOML form of [`HydraConfig`]; every field is optional
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub hydra_path: Option<String>,
    pub results_dir: Option<PathBuf>,
    pub default_tasks: Option<u32>,
    pub default_timeout_secs: Option<u64>,
    pub stop_on_success: Option<bool>,
}

impl From<&HydraConfig> for ConfigFile {
    fn from(config: &HydraConfig) -> Self {
        ConfigFile {
            hydra_path: Some(config.hydra_path.clone()),
            results_dir: Some(config.results_dir.clone()),
            default_tasks: Some(config.default_tasks),
            default_timeout_secs: Some(config.default_timeout.as_secs()),
            stop_on_success: Some(config.stop_on_success),
        }
    }
}

impl ConfigFile {
    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        toml::from_str(&content)
            .map_err(|e| HydraError::parse(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HydraError::parse(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;

        Ok(())
    }

    /// Copy every field present in the file onto `config`
    pub fn apply_to(&self, config: &mut HydraConfig) {
        if let Some(path) = &self.hydra_path {
            config.hydra_path = path.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(tasks) = self.default_tasks {
            config.default_tasks = tasks;
        }
        if let Some(secs) = self.default_timeout_secs {
            config.default_timeout = Duration::from_secs(secs);
        }
        if let Some(stop) = self.stop_on_success {
            config.stop_on_success = stop;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_overrides_only_present_fields() {
        let file: ConfigFile = toml::from_str(
            r#"
            results_dir = "/tmp/hydra-out"
            default_tasks = 4
            "#,
        )
        .unwrap();

        let mut config = HydraConfig::default();
        file.apply_to(&mut config);

        assert_eq!(config.results_dir, PathBuf::from("/tmp/hydra-out"));
        assert_eq!(config.default_tasks, 4);
        assert_eq!(config.hydra_path, "hydra");
        assert_eq!(config.default_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("rusthydra-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rusthydra.toml");

        let original = ConfigFile::from(&HydraConfig::default());
        original.save_to_file(&path).unwrap();
        let loaded = ConfigFile::load_from_file(&path).unwrap();
        assert_eq!(loaded, original);

        let mut config = HydraConfig {
            default_tasks: 1,
            ..HydraConfig::default()
        };
        loaded.apply_to(&mut config);
        assert_eq!(config, HydraConfig::default());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_file() {
        let result: std::result::Result<ConfigFile, _> = toml::from_str("default_tasks = \"many\"");
        assert!(result.is_err());
        assert!(ConfigFile::load_from_file("/definitely/not/here.toml").is_err());
    }
}
