//! Common test fixtures for integration tests.

use agrocast::artifacts::Capability;
use agrocast::config::ArtifactConfig;
use agrocast::model::{Activation, DenseModel, Layer};
use agrocast::scaler::Scaler;
use ndarray::{Array1, Array2};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with a temporary artifact tree and data directory.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub artifacts: ArtifactConfig,
    pub data_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let artifacts = ArtifactConfig {
            root: temp_dir.path().join("models"),
        };
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            artifacts,
            data_dir,
        }
    }

    /// Write a model/scaler pair for the capability into the artifact tree.
    pub fn install(&self, capability: Capability, model: &DenseModel, scaler: &Scaler) {
        let model_path = self.artifacts.model_path(capability);
        std::fs::create_dir_all(model_path.parent().unwrap()).expect("Failed to create dir");
        model.to_file(&model_path).expect("Failed to write model");
        scaler
            .to_file(&self.artifacts.scaler_path(capability))
            .expect("Failed to write scaler");
    }

    /// Install both capabilities with the standard test artifacts.
    pub fn install_all(&self) {
        self.install(Capability::Soil, &soil_model(), &soil_scaler());
        self.install(Capability::Weather, &weather_model(), &weather_scaler());
    }
}

/// Soil classifier: sigmoid over the first feature only. With the identity
/// scaler, large positive N gives "High" and large negative N gives "Low".
pub fn soil_model() -> DenseModel {
    let mut weights = Array2::zeros((12, 1));
    weights[[0, 0]] = 1.0;
    DenseModel::new(
        "soil_fixture",
        vec![Layer::new(weights, Array1::zeros(1), Activation::Sigmoid)],
    )
}

/// Identity standardizing scaler for the 12 soil features.
pub fn soil_scaler() -> Scaler {
    Scaler::Standard {
        mean: Array1::zeros(12),
        scale: Array1::ones(12),
    }
}

/// Weather regressor: linear sum of the 3 inputs.
pub fn weather_model() -> DenseModel {
    DenseModel::new(
        "weather_fixture",
        vec![Layer::new(
            Array2::ones((3, 1)),
            Array1::zeros(1),
            Activation::Linear,
        )],
    )
}

/// Identity min-max scaler (min 0, max 1) for the 3 weather features.
pub fn weather_scaler() -> Scaler {
    Scaler::MinMax {
        data_min: Array1::zeros(3),
        data_max: Array1::ones(3),
    }
}

/// A complete, valid soil analysis payload.
pub fn soil_payload(n: f64) -> Value {
    json!({
        "N": n,
        "P": 12.0,
        "K": 140.0,
        "pH": 6.5,
        "EC": 0.4,
        "OC": 0.7,
        "S": 10.0,
        "Zn": 0.8,
        "Fe": 4.2,
        "Cu": 0.3,
        "Mn": 2.1,
        "B": 0.5
    })
}
