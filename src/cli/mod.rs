//! CLI module for the connector
//!
//! Provides command-line interface for:
//! - run: Execute a document operation over input records
//! - health: Check the backend endpoint
//! - queries: Encode builder rows or custom query text offline

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{encode_queries, health, queries, run, run_command, run_records};
pub use config::ConnectorConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, read_object_file, read_records_file, write_json};
