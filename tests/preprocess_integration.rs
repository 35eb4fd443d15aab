//! Integration tests for the preprocessing job.

#[allow(dead_code)]
mod common;

use agrocast::artifacts::Capability;
use agrocast::config::PreprocessConfig;
use agrocast::preprocess;
use agrocast::scaler::Scaler;
use common::TestEnv;
use std::path::{Path, PathBuf};

/// Write a small deterministic soil dataset: 3 feature columns + Output.
fn write_sample_csv(path: &Path, rows: usize) -> PathBuf {
    let mut content = String::from("N,P,K,Output\n");
    for i in 0..rows {
        let n = i as f64;
        content.push_str(&format!("{},{},{},{}\n", n, n * 2.0, 100.0 - n, i % 2));
    }
    std::fs::write(path, content).unwrap();
    path.to_path_buf()
}

fn preprocess_config(env: &TestEnv, output_dir: &Path, seed: u64) -> PreprocessConfig {
    PreprocessConfig {
        input_csv: env.data_dir.join("soil_data.csv"),
        output_dir: output_dir.to_path_buf(),
        test_fraction: 0.2,
        seed,
    }
}

const OUTPUT_FILES: [&str; 4] = [
    "X_train_scaled.csv",
    "X_test_scaled.csv",
    "y_train.csv",
    "y_test.csv",
];

#[test]
fn test_preprocess_writes_expected_layout() {
    let env = TestEnv::new();
    write_sample_csv(&env.data_dir.join("soil_data.csv"), 25);

    let output_dir = env.temp_dir.path().join("out");
    let config = preprocess_config(&env, &output_dir, 42);
    let summary = preprocess::run(&config, &env.artifacts).unwrap();

    assert_eq!(summary.test_rows, 5);
    assert_eq!(summary.train_rows, 20);
    assert_eq!(summary.features, vec!["N", "P", "K"]);

    for file in OUTPUT_FILES {
        assert!(output_dir.join(file).exists(), "missing {}", file);
    }
    assert!(env.artifacts.scaler_path(Capability::Soil).exists());
}

#[test]
fn test_preprocess_is_reproducible() {
    let env = TestEnv::new();
    write_sample_csv(&env.data_dir.join("soil_data.csv"), 25);

    let out_a = env.temp_dir.path().join("a");
    let out_b = env.temp_dir.path().join("b");
    preprocess::run(&preprocess_config(&env, &out_a, 42), &env.artifacts).unwrap();
    preprocess::run(&preprocess_config(&env, &out_b, 42), &env.artifacts).unwrap();

    for file in OUTPUT_FILES {
        let bytes_a = std::fs::read(out_a.join(file)).unwrap();
        let bytes_b = std::fs::read(out_b.join(file)).unwrap();
        assert_eq!(bytes_a, bytes_b, "{} differs between identical runs", file);
    }
}

#[test]
fn test_preprocess_seed_changes_split() {
    let env = TestEnv::new();
    write_sample_csv(&env.data_dir.join("soil_data.csv"), 50);

    let out_a = env.temp_dir.path().join("a");
    let out_b = env.temp_dir.path().join("b");
    preprocess::run(&preprocess_config(&env, &out_a, 42), &env.artifacts).unwrap();
    preprocess::run(&preprocess_config(&env, &out_b, 7), &env.artifacts).unwrap();

    let y_a = std::fs::read(out_a.join("y_test.csv")).unwrap();
    let y_b = std::fs::read(out_b.join("y_test.csv")).unwrap();
    assert_ne!(y_a, y_b);
}

#[test]
fn test_persisted_scaler_is_standard_and_loadable() {
    let env = TestEnv::new();
    write_sample_csv(&env.data_dir.join("soil_data.csv"), 30);

    let output_dir = env.temp_dir.path().join("out");
    preprocess::run(&preprocess_config(&env, &output_dir, 42), &env.artifacts).unwrap();

    let scaler = Scaler::from_file(&env.artifacts.scaler_path(Capability::Soil)).unwrap();
    assert!(matches!(scaler, Scaler::Standard { .. }));
    assert_eq!(scaler.n_features(), 3);
}

#[test]
fn test_missing_input_is_fatal() {
    let env = TestEnv::new();
    let config = preprocess_config(&env, &env.temp_dir.path().join("out"), 42);
    assert!(preprocess::run(&config, &env.artifacts).is_err());
}

#[test]
fn test_missing_target_column_is_fatal() {
    let env = TestEnv::new();
    std::fs::write(
        env.data_dir.join("soil_data.csv"),
        "N,P,K,Result\n1,2,3,0\n",
    )
    .unwrap();

    let config = preprocess_config(&env, &env.temp_dir.path().join("out"), 42);
    let err = preprocess::run(&config, &env.artifacts).unwrap_err();
    assert!(err.to_string().contains("Output"));
}

#[test]
fn test_artifact_config_dropped_scaler_breaks_only_soil() {
    // End-to-end: preprocess produces a soil scaler, but without a soil
    // model the capability stays unavailable while weather serves.
    let env = TestEnv::new();
    write_sample_csv(&env.data_dir.join("soil_data.csv"), 25);
    preprocess::run(
        &preprocess_config(&env, &env.temp_dir.path().join("out"), 42),
        &env.artifacts,
    )
    .unwrap();
    env.install(
        Capability::Weather,
        &common::weather_model(),
        &common::weather_scaler(),
    );

    let store = agrocast::artifacts::ArtifactStore::load(&env.artifacts);
    assert!(!store.is_available(Capability::Soil));
    assert!(store.is_available(Capability::Weather));
}

#[test]
fn test_output_is_actually_scaled() {
    let env = TestEnv::new();
    write_sample_csv(&env.data_dir.join("soil_data.csv"), 25);

    let output_dir = env.temp_dir.path().join("out");
    preprocess::run(&preprocess_config(&env, &output_dir, 42), &env.artifacts).unwrap();

    // Training partition is standardized: per-column mean approximately 0.
    let mut reader = csv::Reader::from_path(output_dir.join("X_train_scaled.csv")).unwrap();
    let mut sums = vec![0.0f64; 3];
    let mut rows = 0usize;
    for record in reader.records() {
        let record = record.unwrap();
        for (i, field) in record.iter().enumerate() {
            sums[i] += field.parse::<f64>().unwrap();
        }
        rows += 1;
    }
    assert_eq!(rows, 20);
    for sum in sums {
        assert!((sum / rows as f64).abs() < 1e-9);
    }
}
