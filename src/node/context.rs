//! # Host Context
//!
//! What the host workflow engine supplies to a run: the number of input
//! records, already-resolved per-record parameters, and the continue-on-fail
//! policy. Expression evaluation happens on the host side; this crate only
//! sees resolved values.

use serde_json::{Map, Value};

use super::errors::{NodeError, NodeResult};

/// Host engine seam
pub trait NodeContext {
    /// Number of input records in this run
    fn item_count(&self) -> usize;

    /// Resolved value of parameter `name` for record `item_index`
    fn parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    /// Convert record failures into `{error}` rows instead of aborting
    fn continue_on_fail(&self) -> bool;

    /// String-typed accessor. Numbers and booleans are rendered as text.
    fn string_parameter(&self, name: &str, item_index: usize) -> NodeResult<Option<String>> {
        match self.parameter(name, item_index) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(type_error(name, "a string", item_index)),
        }
    }

    /// Number-typed accessor. Numeric strings are accepted.
    fn number_parameter(&self, name: &str, item_index: usize) -> NodeResult<Option<f64>> {
        match self.parameter(name, item_index) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| type_error(name, "a number", item_index)),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| type_error(name, "a number", item_index)),
            Some(_) => Err(type_error(name, "a number", item_index)),
        }
    }

    /// Boolean-typed accessor. `"true"`/`"false"` strings are accepted.
    fn boolean_parameter(&self, name: &str, item_index: usize) -> NodeResult<Option<bool>> {
        match self.parameter(name, item_index) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(Value::String(s)) => match s.trim() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(type_error(name, "a boolean", item_index)),
            },
            Some(_) => Err(type_error(name, "a boolean", item_index)),
        }
    }

    /// JSON-typed accessor: the resolved value as-is
    fn json_parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.parameter(name, item_index)
            .filter(|value| !value.is_null())
    }
}

fn type_error(name: &str, expected: &str, item_index: usize) -> NodeError {
    NodeError::validation(
        item_index,
        format!("Parameter '{}' must be {}", name, expected),
    )
}

/// In-memory context: base parameters plus per-record overrides.
///
/// Each record's own keys take precedence over the base parameters. Used by
/// the CLI and by tests.
#[derive(Debug, Clone)]
pub struct JsonContext {
    base: Map<String, Value>,
    items: Vec<Map<String, Value>>,
    continue_on_fail: bool,
}

impl JsonContext {
    /// A context with a single record and no overrides
    pub fn new(base: Map<String, Value>) -> Self {
        Self {
            base,
            items: vec![Map::new()],
            continue_on_fail: false,
        }
    }

    /// Replace the records; each map overrides base parameters for its record
    pub fn with_items(mut self, items: Vec<Map<String, Value>>) -> Self {
        self.items = items;
        self
    }

    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }
}

impl NodeContext for JsonContext {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.items
            .get(item_index)
            .and_then(|item| item.get(name))
            .or_else(|| self.base.get(name))
            .cloned()
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}
