//! CLI command implementations
//!
//! Each command loads what it needs, runs to completion on a single-threaded
//! runtime, and writes its result to stdout. The CLI plays the host engine:
//! the parameters file and the input records stand in for the host's
//! resolved per-record parameters.

use std::path::Path;

use tokio::runtime::{Builder, Runtime};

use crate::client::{DocumentBackend, HttpBackend};
use crate::node::{DocumentExecutor, JsonContext};
use crate::observability;
use crate::query::{CustomQueryParser, QueryBuilder, QueryExpression, QueryTuple};

use super::args::{Cli, Command};
use super::config::ConnectorConfig;
use super::errors::{CliError, CliResult};
use super::io::{read_object_file, read_records_file, read_stdin, write_json, write_lines};

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Run {
            config,
            params,
            input,
            continue_on_fail,
        } => run_records(&config, &params, input.as_deref(), continue_on_fail),
        Command::Health { config } => health(&config),
        Command::Queries { custom } => queries(custom),
    }
}

/// Records are processed one at a time, so a current-thread runtime suffices
fn runtime() -> CliResult<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime_error(e.to_string()))
}

/// Load config, install logging and build the backend client
fn connect(config_path: &Path) -> CliResult<(ConnectorConfig, HttpBackend)> {
    let config = ConnectorConfig::load(config_path)?;
    observability::init(&config.log_level, config.log_format);

    let backend = HttpBackend::new(&config.credentials, config.timeout())
        .map_err(|e| CliError::config_error(e.to_string()))?;

    tracing::debug!(
        event = "BACKEND_CONFIGURED",
        endpoint = config.credentials.endpoint(),
        project_id = %config.credentials.project_id,
        database_id = %config.credentials.database_id
    );

    Ok((config, backend))
}

/// Execute the configured operation over every input record
pub fn run_records(
    config_path: &Path,
    params_path: &Path,
    input_path: Option<&Path>,
    continue_on_fail: bool,
) -> CliResult<()> {
    let (config, backend) = connect(config_path)?;

    let base = read_object_file(params_path)?;
    let mut ctx = JsonContext::new(base).with_continue_on_fail(continue_on_fail);
    if let Some(path) = input_path {
        ctx = ctx.with_items(read_records_file(path)?);
    }

    let rt = runtime()?;
    let mut executor = DocumentExecutor::new(&backend, config.credentials.database_id.clone());
    let rows = rt
        .block_on(executor.run(&ctx))
        .map_err(|e| CliError::run_failed(&e))?;

    write_json(&rows)
}

/// Call the liveness endpoint and print its response
pub fn health(config_path: &Path) -> CliResult<()> {
    let (_config, backend) = connect(config_path)?;

    let rt = runtime()?;
    let status = rt
        .block_on(backend.health())
        .map_err(|e| CliError::health_check_failed(&e))?;

    write_json(&status)
}

/// Encode queries from stdin: custom text, or a JSON array of builder rows
pub fn queries(custom: bool) -> CliResult<()> {
    let input = read_stdin()?;
    let expressions = encode_queries(&input, custom)?;
    write_lines(expressions)
}

/// Wire strings for `input`, in order
pub fn encode_queries(input: &str, custom: bool) -> CliResult<Vec<String>> {
    let expressions = if custom {
        CustomQueryParser::parse(input)?
    } else {
        let tuples: Vec<QueryTuple> = serde_json::from_str(input)?;
        QueryBuilder::build(&tuples)?
    };

    Ok(expressions.iter().map(QueryExpression::encode).collect())
}
