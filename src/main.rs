//! Agrocast CLI - Main entry point.

use agrocast::cli::{Cli, Commands};
use agrocast::config::AgrocastConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let mut config = match &cli.config {
        Some(path) => AgrocastConfig::from_file(path)?,
        None => AgrocastConfig::development(),
    };
    config.observability.log_level = cli.log_level.clone();

    match cli.command {
        Commands::Serve {
            bind_addr,
            artifact_dir,
            no_cors,
        } => {
            config.server.bind_addr = bind_addr.parse()?;
            config.artifacts.root = artifact_dir;
            config.server.cors = !no_cors;

            agrocast::run(config).await?;
        }

        Commands::Preprocess {
            input,
            output_dir,
            artifact_dir,
            seed,
        } => {
            agrocast::observability::init(&config.observability)?;
            config.preprocess.input_csv = input;
            config.preprocess.output_dir = output_dir;
            config.preprocess.seed = seed;
            config.artifacts.root = artifact_dir;

            let summary = agrocast::preprocess::run(&config.preprocess, &config.artifacts)?;
            println!(
                "Preprocessing complete: {} train rows, {} test rows, {} features",
                summary.train_rows,
                summary.test_rows,
                summary.features.len()
            );
        }

        Commands::Version => {
            println!("Agrocast v{}", env!("CARGO_PKG_VERSION"));
            println!("HTTP serving for pre-trained soil and weather models");
        }
    }

    Ok(())
}
