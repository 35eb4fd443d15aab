//! Feature scalers applied before inference.
//!
//! A scaler is fit once offline and persisted next to its model; at request
//! time it is only ever applied in transform mode. Two kinds exist: the soil
//! pipeline standardizes features (zero mean, unit variance), the weather
//! pipeline rescales into the unit interval.

use crate::error::{AgrocastError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fitted feature scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// Standardization: `(x - mean) / scale` per column.
    Standard {
        mean: Array1<f64>,
        scale: Array1<f64>,
    },
    /// Min-max rescaling: `(x - min) / (max - min)` per column.
    MinMax {
        data_min: Array1<f64>,
        data_max: Array1<f64>,
    },
}

impl Scaler {
    /// Fit a standardizing scaler on the given feature matrix.
    ///
    /// Zero-variance columns get a scale of 1.0 so transform never divides
    /// by zero.
    pub fn fit_standard(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(AgrocastError::InvalidInput(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| AgrocastError::Internal("mean of empty axis".to_string()))?;
        // Population std (ddof = 0), matching the fitted artifacts.
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 { 1.0 } else { s });

        Ok(Scaler::Standard { mean, scale })
    }

    /// Number of features this scaler was fit on.
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { data_min, .. } => data_min.len(),
        }
    }

    /// Apply the fitted transform to a feature matrix.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(AgrocastError::ShapeMismatch {
                expected: self.n_features(),
                got: x.ncols(),
            });
        }

        match self {
            Scaler::Standard { mean, scale } => Ok((x - mean) / scale),
            Scaler::MinMax { data_min, data_max } => {
                // Constant columns map to 0.0.
                let range = (data_max - data_min).mapv(|r| if r == 0.0 { 1.0 } else { r });
                Ok((x - data_min) / &range)
            }
        }
    }

    /// Load a scaler from a JSON artifact file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AgrocastError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| AgrocastError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Persist the scaler as a JSON artifact file.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| AgrocastError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
