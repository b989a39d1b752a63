//! Configuration types for the moduli pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Batch run configuration.
///
/// Defaults reproduce the fixed constants of the original workflow: scan a
/// `data` folder and write `moduli_summary.csv` next to the working
/// directory. The measurement column names and the compress-phase suffix
/// are part of the file contract and are not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory to scan for *.csv measurement files
    #[serde(default = "default_folder")]
    pub folder: PathBuf,

    /// Path of the summary CSV written after a successful run
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_folder() -> PathBuf {
    PathBuf::from("data")
}

fn default_output() -> PathBuf {
    PathBuf::from("moduli_summary.csv")
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            output: default_output(),
        }
    }
}

impl BatchConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: BatchConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.folder, PathBuf::from("data"));
        assert_eq!(config.output, PathBuf::from("moduli_summary.csv"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: BatchConfig = serde_yaml::from_str("folder: measurements\n").unwrap();
        assert_eq!(config.folder, PathBuf::from("measurements"));
        assert_eq!(config.output, PathBuf::from("moduli_summary.csv"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let config = BatchConfig {
            folder: PathBuf::from("runs/2024"),
            output: PathBuf::from("runs/summary.csv"),
        };
        config.to_yaml(&path).unwrap();

        let loaded = BatchConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.folder, config.folder);
        assert_eq!(loaded.output, config.output);
    }
}
