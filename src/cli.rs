//! Command-line interface for Agrocast.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Agrocast - HTTP serving for pre-trained agronomy models.
#[derive(Parser)]
#[command(name = "agrocast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "AGROCAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "AGROCAST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the prediction server
    Serve {
        /// Bind address for the HTTP service
        #[arg(long, default_value = "0.0.0.0:8000")]
        bind_addr: String,

        /// Root directory for model/scaler artifacts
        #[arg(long, default_value = "models")]
        artifact_dir: PathBuf,

        /// Disable permissive CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Run the soil dataset preprocessing job
    Preprocess {
        /// Input soil dataset CSV
        #[arg(long, default_value = "data/soil/soil_data.csv")]
        input: PathBuf,

        /// Output directory for the derived train/test CSVs
        #[arg(long, default_value = "data/soil")]
        output_dir: PathBuf,

        /// Root directory for model/scaler artifacts
        #[arg(long, default_value = "models")]
        artifact_dir: PathBuf,

        /// Random seed for the train/test split
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Show version information
    Version,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
