//! Configuration module for Agrocast.

use crate::artifacts::Capability;
use crate::error::{AgrocastError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration for an Agrocast process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgrocastConfig {
    /// HTTP service configuration.
    pub server: ServerConfig,
    /// Artifact layout configuration.
    pub artifacts: ArtifactConfig,
    /// Preprocessing job configuration.
    pub preprocess: PreprocessConfig,
    /// Observability configuration.
    pub observability: ObservabilityConfig,
}

impl AgrocastConfig {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AgrocastError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AgrocastError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.artifacts.root.as_os_str().is_empty() {
            return Err(AgrocastError::InvalidConfig {
                field: "artifacts.root".to_string(),
                reason: "Artifact root must not be empty".to_string(),
            });
        }

        if !(self.preprocess.test_fraction > 0.0 && self.preprocess.test_fraction < 1.0) {
            return Err(AgrocastError::InvalidConfig {
                field: "preprocess.test_fraction".to_string(),
                reason: "Test fraction must be strictly between 0 and 1".to_string(),
            });
        }

        if self.observability.log_level.is_empty() {
            return Err(AgrocastError::InvalidConfig {
                field: "observability.log_level".to_string(),
                reason: "Log level must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Create a minimal development configuration.
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1:8000".parse().expect("valid socket address"),
                cors: true,
            },
            artifacts: ArtifactConfig {
                root: PathBuf::from("models"),
            },
            preprocess: PreprocessConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the prediction service.
    pub bind_addr: SocketAddr,
    /// Enable permissive CORS headers.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".parse().expect("valid socket address"),
            cors: true,
        }
    }
}

/// Artifact layout configuration.
///
/// Artifacts live under `<root>/<capability dir>/{model.json,scaler.json}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Root directory for model/scaler artifacts.
    pub root: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("models"),
        }
    }
}

impl ArtifactConfig {
    /// Path of the model artifact for a capability.
    pub fn model_path(&self, capability: Capability) -> PathBuf {
        self.root.join(capability.dir_name()).join("model.json")
    }

    /// Path of the scaler artifact for a capability.
    pub fn scaler_path(&self, capability: Capability) -> PathBuf {
        self.root.join(capability.dir_name()).join("scaler.json")
    }
}

/// Preprocessing job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Input soil dataset CSV.
    pub input_csv: PathBuf,
    /// Directory for the derived train/test CSVs.
    pub output_dir: PathBuf,
    /// Fraction of rows held out for the test partition.
    pub test_fraction: f64,
    /// Random seed for the train/test split.
    pub seed: u64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from("data/soil/soil_data.csv"),
            output_dir: PathBuf::from("data/soil"),
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Enable Prometheus metrics on `GET /metrics`.
    pub metrics_enabled: bool,
    /// Log level.
    pub log_level: String,
    /// Enable JSON logging.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
