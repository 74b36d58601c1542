pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Backend;

#[derive(Parser)]
#[command(name = "statbunker-tap")]
#[command(about = "Extract seasons, matches and match reports from Statbunker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the configured streams
    Run {
        /// Path to the tap config (.toml or .json)
        #[arg(short, long)]
        config: PathBuf,

        /// Run only this stream (seasons, matches, match_details)
        #[arg(short, long)]
        stream: Option<String>,

        /// Page session backend
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// Site root to resolve stream pages against
        #[arg(long)]
        base_url: Option<String>,

        /// Store records in this SQLite database instead of printing them
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print the stream catalog
    Discover,
    /// Print stored records of a stream
    Show {
        /// Database path (default: the data directory)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Stream name
        #[arg(short, long)]
        stream: String,
    },
}
