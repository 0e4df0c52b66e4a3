use std::fs;
use std::path::{Path, PathBuf};

use ising_core::{ErrorInfo, IsingError};
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;

/// Structured manifest describing a temperature sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepManifest {
    /// Configuration used for the sweep.
    pub config: SimulationConfig,
    /// Temperatures in sweep order.
    pub temperatures: Vec<f64>,
    /// Biases simulated at every temperature.
    pub biases: Vec<f64>,
    /// RFC 3339 timestamp recording when the sweep started.
    pub created_at: String,
    /// Result tables produced by the sweep.
    pub outputs: Vec<PathBuf>,
}

impl SweepManifest {
    /// Captures the configuration and temperature list, stamped with the current UTC time.
    pub fn new(config: &SimulationConfig, temperatures: &[f64], outputs: Vec<PathBuf>) -> Self {
        Self {
            config: config.clone(),
            temperatures: temperatures.to_vec(),
            biases: config.biases.values(),
            created_at: chrono::Utc::now().to_rfc3339(),
            outputs,
        }
    }

    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), IsingError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| IsingError::io("manifest-mkdir", err, parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            IsingError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| IsingError::io("manifest-write", err, path.display()))
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, IsingError> {
        let contents = fs::read_to_string(path)
            .map_err(|err| IsingError::io("manifest-read", err, path.display()))?;
        serde_json::from_str(&contents).map_err(|err| {
            IsingError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
