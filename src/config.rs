//! Configuration for the sequencer process.
//!
//! Loads and saves device names and period sizing to/from YAML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete sequencer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Client name used for every MIDI connection
    pub client_name: String,
    /// Substring of the controller's input and output port names
    pub controller_device: String,
    /// Substring of the clock source's output port name
    pub clock_device: String,
    /// Substring of the port names of the interface the drum module hangs off
    pub drum_device: String,
    /// Length of one processing period in microseconds
    pub period_micros: u64,
    /// Most events taken from each input per period
    pub max_events_per_period: usize,
    /// Most messages written to each output per period
    pub output_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_name: "gridseq".to_string(),
            controller_device: "Launchpad Mini".to_string(),
            clock_device: "jack_midi_clock".to_string(),
            drum_device: "Scarlett 6i6".to_string(),
            period_micros: 1000,
            max_events_per_period: 256,
            output_capacity: 512,
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        let project_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        project_dir.join("gridseq.yaml")
    }

    /// Load configuration from a YAML file. A missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config YAML {}", path.display()))
    }

    /// Save configuration to a YAML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    pub fn period(&self) -> Duration {
        Duration::from_micros(self.period_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridseq.yaml");

        let config = Config {
            controller_device: "Launchpad X".to_string(),
            period_micros: 500,
            ..Config::default()
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridseq.yaml");
        fs::write(&path, "clock_device: IAC\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.clock_device, "IAC");
        assert_eq!(config.controller_device, "Launchpad Mini");
        assert_eq!(config.period(), Duration::from_millis(1));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridseq.yaml");
        fs::write(&path, "period_micros: [not, a, number]\n").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
