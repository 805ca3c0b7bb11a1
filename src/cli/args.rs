//! CLI argument definitions using clap
//!
//! Commands:
//! - appwrite-connector run --config <path> --params <path> [--input <path>] [--continue-on-fail]
//! - appwrite-connector health --config <path>
//! - appwrite-connector queries [--custom]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Document CRUD connector for the Appwrite databases API
#[derive(Parser, Debug)]
#[command(name = "appwrite-connector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a document operation over a batch of input records
    Run {
        /// Path to configuration file
        #[arg(long, default_value = "./appwrite.json")]
        config: PathBuf,

        /// JSON object of node parameters shared by every record
        #[arg(long)]
        params: PathBuf,

        /// JSON array of records; each record's keys override the parameters
        #[arg(long)]
        input: Option<PathBuf>,

        /// Emit an error row for a failing record instead of aborting
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// Check that the configured endpoint is reachable
    Health {
        /// Path to configuration file
        #[arg(long, default_value = "./appwrite.json")]
        config: PathBuf,
    },

    /// Encode queries read from stdin and print one per line
    Queries {
        /// Read custom query text instead of a JSON array of builder rows
        #[arg(long)]
        custom: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
