//! Immediate renderer configuration
//!
//! Tunables for buffer growth and the shared sampler. Stored as TOML; every field
//! falls back to its default when absent.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Immediate renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmediateConfig {
    /// Smallest vertex/index buffer capacity in elements (default: 32)
    #[serde(default = "default_min_geometry_capacity")]
    pub min_geometry_capacity: usize,
    /// Buffers of at least this many bytes go to device-local memory (default: 256 KiB)
    #[serde(default = "default_device_local_threshold")]
    pub device_local_threshold: u64,
    /// Smallest uniform buffer capacity in state versions (default: 32)
    #[serde(default = "default_min_uniform_versions")]
    pub min_uniform_versions: usize,
    /// Anisotropy of the shared linear sampler (default: 1)
    #[serde(default = "default_max_anisotropy")]
    pub max_anisotropy: u16,
    /// Maximum mip level of the shared linear sampler (default: 1000.0)
    #[serde(default = "default_max_lod")]
    pub max_lod: f32,
}

fn default_min_geometry_capacity() -> usize {
    32
}
fn default_device_local_threshold() -> u64 {
    256 * 1024
}
fn default_min_uniform_versions() -> usize {
    32
}
fn default_max_anisotropy() -> u16 {
    1
}
fn default_max_lod() -> f32 {
    1000.0
}

impl Default for ImmediateConfig {
    fn default() -> Self {
        Self {
            min_geometry_capacity: default_min_geometry_capacity(),
            device_local_threshold: default_device_local_threshold(),
            min_uniform_versions: default_min_uniform_versions(),
            max_anisotropy: default_max_anisotropy(),
            max_lod: default_max_lod(),
        }
    }
}

impl ImmediateConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from `path`, or defaults if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!("Loaded immediate renderer config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImmediateConfig::default();
        assert_eq!(config.min_geometry_capacity, 32);
        assert_eq!(config.device_local_threshold, 256 * 1024);
        assert_eq!(config.min_uniform_versions, 32);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ImmediateConfig::from_toml_str("min_geometry_capacity = 64\n").unwrap();
        assert_eq!(config.min_geometry_capacity, 64);
        assert_eq!(config.device_local_threshold, 256 * 1024);
        assert_eq!(config.max_lod, 1000.0);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = ImmediateConfig::from_toml_str("min_geometry_capacity = \"many\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("immediate.toml");

        let config = ImmediateConfig {
            device_local_threshold: 1024,
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(ImmediateConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImmediateConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ImmediateConfig::default());
    }
}
