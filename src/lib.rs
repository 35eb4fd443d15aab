//! Agrocast - HTTP serving for pre-trained agronomy models.
//!
//! Agrocast serves two pre-trained models behind a small HTTP API: a soil
//! fertility classifier and a weather temperature regressor. Incoming JSON
//! is validated, passed through a persisted feature scaler, and fed to the
//! loaded model; the result is shaped into a compact JSON response.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        Agrocast                          │
//! ├─────────────────────────────────────────────────────────┤
//! │  HTTP Service: health | soil-analysis | weather          │
//! ├─────────────────────────────────────────────────────────┤
//! │  Artifact Store: model + scaler per capability           │
//! ├─────────────────────────────────────────────────────────┤
//! │  Offline: soil preprocessing (split, scale, persist)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Artifacts are loaded once at startup; a missing or unreadable artifact
//! degrades that capability only, and its endpoint reports the condition at
//! request time. The other capability keeps serving.
//!
//! # Quick Start
//!
//! ```no_run
//! use agrocast::config::AgrocastConfig;
//!
//! #[tokio::main]
//! async fn main() -> agrocast::Result<()> {
//!     let config = AgrocastConfig::development();
//!     agrocast::run(config).await
//! }
//! ```

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod observability;
pub mod preprocess;
pub mod scaler;
pub mod server;

// Re-exports
pub use error::{AgrocastError, Result};

use artifacts::{ArtifactStore, Capability};
use config::AgrocastConfig;
use server::AppState;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the Agrocast server with the given configuration.
pub async fn run(config: AgrocastConfig) -> Result<()> {
    observability::init(&config.observability)?;
    config.validate()?;

    info!(root = %config.artifacts.root.display(), "Loading artifacts");
    let artifacts = Arc::new(ArtifactStore::load(&config.artifacts));

    for capability in Capability::ALL {
        if artifacts.is_available(capability) {
            info!(capability = capability.as_str(), "Capability available");
        } else {
            warn!(
                capability = capability.as_str(),
                "Capability unavailable; its endpoint will report an error"
            );
        }
    }

    let metrics = if config.observability.metrics_enabled {
        Some(observability::install_metrics()?)
    } else {
        None
    };

    let state = AppState::new(artifacts, metrics);
    server::run_server(&config.server, state).await
}
