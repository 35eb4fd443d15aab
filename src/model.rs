//! Dense model artifacts.
//!
//! Both served models are small feed-forward networks persisted as JSON:
//! a stack of dense layers (weight matrix, bias vector, activation). The
//! soil classifier ends in a sigmoid and emits one probability-like scalar;
//! the weather regressor ends in a linear layer and emits one temperature.
//! Training happens offline; this module only loads and evaluates.

use crate::error::{AgrocastError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Activation function applied element-wise after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, v: f64) -> f64 {
        match self {
            Activation::Linear => v,
            Activation::Relu => v.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-v).exp()),
            Activation::Tanh => v.tanh(),
        }
    }
}

/// A single dense layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Weight matrix, shape `(inputs, outputs)`.
    pub weights: Array2<f64>,
    /// Bias vector, length `outputs`.
    pub bias: Array1<f64>,
    /// Activation applied to the layer output.
    pub activation: Activation,
}

impl Layer {
    pub fn new(weights: Array2<f64>, bias: Array1<f64>, activation: Activation) -> Self {
        Self {
            weights,
            bias,
            activation,
        }
    }
}

/// A loaded dense model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseModel {
    /// Model name (informational).
    pub name: String,
    /// Layers in evaluation order.
    pub layers: Vec<Layer>,
}

impl DenseModel {
    pub fn new(name: &str, layers: Vec<Layer>) -> Self {
        Self {
            name: name.to_string(),
            layers,
        }
    }

    /// Number of input features expected by the first layer.
    pub fn n_inputs(&self) -> usize {
        self.layers.first().map(|l| l.weights.nrows()).unwrap_or(0)
    }

    /// Run a forward pass over a batch of rows.
    pub fn predict(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        if self.layers.is_empty() {
            return Err(AgrocastError::Inference(format!(
                "model {} has no layers",
                self.name
            )));
        }

        let mut activations = input.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            if activations.ncols() != layer.weights.nrows() {
                return Err(AgrocastError::ShapeMismatch {
                    expected: layer.weights.nrows(),
                    got: activations.ncols(),
                });
            }
            if layer.bias.len() != layer.weights.ncols() {
                return Err(AgrocastError::Inference(format!(
                    "model {}: layer {} bias length {} does not match {} outputs",
                    self.name,
                    i,
                    layer.bias.len(),
                    layer.weights.ncols()
                )));
            }

            activations = activations.dot(&layer.weights) + &layer.bias;
            activations.mapv_inplace(|v| layer.activation.apply(v));
        }

        Ok(activations)
    }

    /// Run a forward pass and extract the single output scalar.
    pub fn predict_scalar(&self, input: &Array2<f64>) -> Result<f64> {
        let output = self.predict(input)?;
        output
            .iter()
            .next()
            .copied()
            .ok_or_else(|| AgrocastError::Inference(format!("model {} produced no output", self.name)))
    }

    /// Load a model from a JSON artifact file.
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

    /// Persist the model as a JSON artifact file.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| AgrocastError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
