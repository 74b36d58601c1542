use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use statbunker_tap::cli::commands::{self, RunOverrides};
use statbunker_tap::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries sink output only
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            stream,
            backend,
            base_url,
            db,
        } => {
            let overrides = RunOverrides {
                stream,
                backend,
                base_url,
            };
            commands::run(&config, overrides, db).await?;
        }
        Commands::Discover => {
            commands::discover()?;
        }
        Commands::Show { db, stream } => {
            commands::show(db, &stream)?;
        }
    }

    Ok(())
}
