//! Artifact loading for the two prediction capabilities.
//!
//! On startup the service resolves a fixed directory layout under the
//! artifact root and loads whatever finished artifacts it finds. A missing
//! or unreadable file degrades that capability only; the other capability
//! keeps serving. Artifacts are immutable after load and reloaded only on
//! process restart.

use crate::config::ArtifactConfig;
use crate::error::{AgrocastError, Result};
use crate::model::DenseModel;
use crate::scaler::Scaler;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{error, info};

/// A supported prediction domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Soil,
    Weather,
}

impl Capability {
    /// All capabilities, in loading order.
    pub const ALL: [Capability; 2] = [Capability::Soil, Capability::Weather];

    /// Short identifier used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Soil => "soil",
            Capability::Weather => "weather",
        }
    }

    /// Key used in the health report.
    pub fn report_key(&self) -> &'static str {
        match self {
            Capability::Soil => "soil_analysis",
            Capability::Weather => "weather_prediction",
        }
    }

    /// Artifact directory name under the artifact root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Capability::Soil => "soil_analysis",
            Capability::Weather => "weather_forecast",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Soil => write!(f, "soil analysis"),
            Capability::Weather => write!(f, "weather prediction"),
        }
    }
}

/// In-memory model and scaler mappings, built once at startup.
///
/// Models and scalers are tracked separately: the health report cares about
/// model presence only, while serving a request requires both halves.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    models: HashMap<Capability, DenseModel>,
    scalers: HashMap<Capability, Scaler>,
}

impl ArtifactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all artifacts found under the configured layout.
    ///
    /// Failures are isolated per capability and per file: a broken soil
    /// artifact never affects the weather pair. Missing files are logged
    /// and left unset.
    pub fn load(config: &ArtifactConfig) -> Self {
        let mut store = Self::new();

        for capability in Capability::ALL {
            let model_path = config.model_path(capability);
            match load_artifact(&model_path, DenseModel::from_file) {
                Ok(Some(model)) => {
                    info!(
                        capability = capability.as_str(),
                        path = %model_path.display(),
                        "Model loaded"
                    );
                    store.models.insert(capability, model);
                }
                Ok(None) => {
                    error!(
                        capability = capability.as_str(),
                        path = %model_path.display(),
                        "Model not found"
                    );
                }
                Err(e) => {
                    error!(
                        capability = capability.as_str(),
                        path = %model_path.display(),
                        error = %e,
                        "Failed to load model"
                    );
                }
            }

            let scaler_path = config.scaler_path(capability);
            match load_artifact(&scaler_path, Scaler::from_file) {
                Ok(Some(scaler)) => {
                    info!(
                        capability = capability.as_str(),
                        path = %scaler_path.display(),
                        "Scaler loaded"
                    );
                    store.scalers.insert(capability, scaler);
                }
                Ok(None) => {
                    error!(
                        capability = capability.as_str(),
                        path = %scaler_path.display(),
                        "Scaler not found"
                    );
                }
                Err(e) => {
                    error!(
                        capability = capability.as_str(),
                        path = %scaler_path.display(),
                        error = %e,
                        "Failed to load scaler"
                    );
                }
            }
        }

        store
    }

    /// Insert a model directly (used by tests and tooling).
    pub fn insert_model(&mut self, capability: Capability, model: DenseModel) {
        self.models.insert(capability, model);
    }

    /// Insert a scaler directly (used by tests and tooling).
    pub fn insert_scaler(&mut self, capability: Capability, scaler: Scaler) {
        self.scalers.insert(capability, scaler);
    }

    /// Whether a model is loaded for the capability (health report
    /// semantics: scaler presence is not considered).
    pub fn has_model(&self, capability: Capability) -> bool {
        self.models.contains_key(&capability)
    }

    /// Whether the capability can serve requests (model AND scaler loaded).
    pub fn is_available(&self, capability: Capability) -> bool {
        self.models.contains_key(&capability) && self.scalers.contains_key(&capability)
    }

    /// Get the model/scaler pair for a capability, or a missing-capability
    /// error if either half is absent.
    pub fn get(&self, capability: Capability) -> Result<(&DenseModel, &Scaler)> {
        let model = self
            .models
            .get(&capability)
            .ok_or(AgrocastError::CapabilityUnavailable(capability))?;
        let scaler = self
            .scalers
            .get(&capability)
            .ok_or(AgrocastError::CapabilityUnavailable(capability))?;
        Ok((model, scaler))
    }
}

/// Load an artifact if its file exists; `Ok(None)` means absent.
fn load_artifact<T>(path: &Path, loader: impl FnOnce(&Path) -> Result<T>) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    loader(path).map(Some)
}
