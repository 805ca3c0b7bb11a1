//! JSON I/O handling for CLI
//!
//! - Input: JSON files, or text on stdin
//! - Output: JSON on stdout, one document per invocation
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{CliError, CliResult};

/// Read and parse a JSON file
pub fn read_json_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::io_error(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Read a JSON file that must hold an object
pub fn read_object_file(path: &Path) -> CliResult<Map<String, Value>> {
    match read_json_file(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::io_error(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
    }
}

/// Read a JSON file that must hold an array of objects
pub fn read_records_file(path: &Path) -> CliResult<Vec<Map<String, Value>>> {
    let items = match read_json_file(path)? {
        Value::Array(items) => items,
        _ => {
            return Err(CliError::io_error(format!(
                "{} must contain a JSON array",
                path.display()
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(CliError::io_error(format!(
                "{}: record {} is not a JSON object",
                path.display(),
                i
            ))),
        })
        .collect()
}

/// Read all of stdin as text
pub fn read_stdin() -> CliResult<String> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    Ok(input)
}

/// Write a value as pretty JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write lines to stdout
pub fn write_lines<I, S>(lines: I) -> CliResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stdout = io::stdout();
    for line in lines {
        writeln!(stdout, "{}", line.as_ref())?;
    }
    stdout.flush()?;

    Ok(())
}
