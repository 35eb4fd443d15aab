//! Offline preprocessing for the soil dataset.
//!
//! A one-shot batch job: read the soil CSV, split into train/test partitions
//! with a fixed seed, fit a standardizing scaler on the training features
//! only, transform both partitions, and persist the derived CSVs plus the
//! fitted scaler. Runs as an explicit CLI command, decoupled from service
//! startup; the service only ever loads finished artifacts.

use crate::artifacts::Capability;
use crate::config::{ArtifactConfig, PreprocessConfig};
use crate::error::{AgrocastError, Result};
use crate::scaler::Scaler;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::info;

/// Name of the target column in the input dataset.
const TARGET_COLUMN: &str = "Output";

/// Summary of a completed preprocessing run.
#[derive(Debug)]
pub struct PreprocessSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: Vec<String>,
}

/// Run the preprocessing job.
///
/// Writes `X_train_scaled.csv`, `X_test_scaled.csv`, `y_train.csv`, and
/// `y_test.csv` under the output directory, and the fitted scaler to the
/// soil artifact path. Errors are fatal and propagate to the caller.
pub fn run(config: &PreprocessConfig, artifacts: &ArtifactConfig) -> Result<PreprocessSummary> {
    let dataset = read_dataset(&config.input_csv)?;
    info!(
        rows = dataset.rows.nrows(),
        features = dataset.feature_names.len(),
        "Dataset loaded"
    );

    let (train_idx, test_idx) =
        split_indices(dataset.rows.nrows(), config.test_fraction, config.seed)?;

    let train = dataset.select_rows(&train_idx);
    let test = dataset.select_rows(&test_idx);

    // Fit on the training partition only; test data is transform-only.
    let scaler = Scaler::fit_standard(&train)?;
    let train_scaled = scaler.transform(&train)?;
    let test_scaled = scaler.transform(&test)?;

    std::fs::create_dir_all(&config.output_dir)?;
    write_matrix_csv(
        &config.output_dir.join("X_train_scaled.csv"),
        &dataset.feature_names,
        &train_scaled,
    )?;
    write_matrix_csv(
        &config.output_dir.join("X_test_scaled.csv"),
        &dataset.feature_names,
        &test_scaled,
    )?;
    write_target_csv(
        &config.output_dir.join("y_train.csv"),
        &dataset.targets,
        &train_idx,
    )?;
    write_target_csv(
        &config.output_dir.join("y_test.csv"),
        &dataset.targets,
        &test_idx,
    )?;

    let scaler_path = artifacts.scaler_path(Capability::Soil);
    if let Some(parent) = scaler_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    scaler.to_file(&scaler_path)?;
    info!(path = %scaler_path.display(), "Scaler persisted");

    Ok(PreprocessSummary {
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        features: dataset.feature_names,
    })
}

/// Deterministic train/test split of `0..n`.
///
/// The same seed and row count always produce the same partition, in the
/// same order.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if n == 0 {
        return Err(AgrocastError::InvalidInput(
            "dataset has no rows".to_string(),
        ));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(AgrocastError::InvalidConfig {
            field: "test_fraction".to_string(),
            reason: "must be strictly between 0 and 1".to_string(),
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64) * test_fraction).ceil() as usize;
    let test = indices[..test_len].to_vec();
    let train = indices[test_len..].to_vec();
    Ok((train, test))
}

/// A parsed soil dataset: numeric feature rows plus raw target values.
struct Dataset {
    feature_names: Vec<String>,
    rows: Array2<f64>,
    targets: Vec<String>,
}

impl Dataset {
    fn select_rows(&self, indices: &[usize]) -> Array2<f64> {
        let mut out = Array2::zeros((indices.len(), self.rows.ncols()));
        for (i, &idx) in indices.iter().enumerate() {
            out.row_mut(i).assign(&self.rows.row(idx));
        }
        out
    }
}

fn read_dataset(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let target_col = headers
        .iter()
        .position(|h| h == TARGET_COLUMN)
        .ok_or_else(|| {
            AgrocastError::InvalidInput(format!(
                "dataset {} has no {} column",
                path.display(),
                TARGET_COLUMN
            ))
        })?;
    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target_col)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut values = Vec::new();
    let mut targets = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for (i, field) in record.iter().enumerate() {
            if i == target_col {
                targets.push(field.to_string());
            } else {
                let v: f64 = field.trim().parse().map_err(|_| {
                    AgrocastError::InvalidInput(format!(
                        "row {}, column {}: not a number: {}",
                        row + 1,
                        headers.get(i).unwrap_or(""),
                        field
                    ))
                })?;
                values.push(v);
            }
        }
    }

    let n_rows = targets.len();
    let rows = Array2::from_shape_vec((n_rows, feature_names.len()), values)
        .map_err(|e| AgrocastError::InvalidInput(format!("ragged dataset: {}", e)))?;

    Ok(Dataset {
        feature_names,
        rows,
        targets,
    })
}

fn write_matrix_csv(path: &Path, headers: &[String], matrix: &Array2<f64>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in matrix.rows() {
        let record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_target_csv(path: &Path, targets: &[String], indices: &[usize]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([TARGET_COLUMN])?;
    for &idx in indices {
        writer.write_record([targets[idx].as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
