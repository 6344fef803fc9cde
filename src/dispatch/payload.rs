//! The wire format between the dispatcher and a command process.
//!
//! The payload is one JSON document passed as a single argument after
//! [`PAYLOAD_FLAG`]:
//!
//! ```json
//! {"schema":1,"host":{"name":"stencil","version":"0.1.0"},"argv":["my-app",{"force":true},{"name":"init"}]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::command::{OptionValue, Options, RuntimeInfo};
use crate::error::{Result, StencilError};

/// Current payload schema version.
pub const PAYLOAD_SCHEMA: u32 = 1;

/// Flag that precedes the payload on the command process's command line.
pub const PAYLOAD_FLAG: &str = "--payload";

/// Keep only options that can cross the process boundary.
///
/// Keys starting with `_`, the key `parent`, and values that are not
/// booleans, numbers or strings are dropped.
pub fn strip_options(options: &Map<String, Value>) -> Options {
    options
        .iter()
        .filter(|(key, _)| !key.starts_with('_') && key.as_str() != "parent")
        .filter_map(|(key, value)| OptionValue::from_json(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Everything a command process is started with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchPayload {
    /// Schema version, [`PAYLOAD_SCHEMA`].
    pub schema: u32,
    /// The dispatching program.
    pub host: RuntimeInfo,
    /// Positional arguments, then the options object, then `{"name": command}`.
    pub argv: Vec<Value>,
}

impl DispatchPayload {
    /// Build the argument list for `command`.
    pub fn new(host: RuntimeInfo, positional: &[String], options: Options, command: &str) -> Self {
        let mut argv: Vec<Value> = positional.iter().cloned().map(Value::String).collect();
        argv.push(Value::Object(
            options
                .into_iter()
                .map(|(key, value)| (key, option_to_json(value)))
                .collect(),
        ));

        let mut reference = Map::new();
        reference.insert("name".to_string(), Value::String(command.to_string()));
        argv.push(Value::Object(reference));

        Self {
            schema: PAYLOAD_SCHEMA,
            host,
            argv,
        }
    }

    /// Serialize to the single-argument form.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| StencilError::Other(e.into()))
    }

    /// Parse a payload, refusing other schema versions.
    pub fn decode(raw: &str) -> Result<Self> {
        let payload: Self =
            serde_json::from_str(raw).map_err(|e| StencilError::InvalidArguments {
                message: format!("malformed payload: {}", e),
            })?;

        if payload.schema != PAYLOAD_SCHEMA {
            return Err(StencilError::InvalidArguments {
                message: format!(
                    "unsupported payload schema {} (expected {})",
                    payload.schema, PAYLOAD_SCHEMA
                ),
            });
        }
        Ok(payload)
    }
}

fn option_to_json(value: OptionValue) -> Value {
    match value {
        OptionValue::Bool(b) => Value::Bool(b),
        OptionValue::Int(i) => Value::from(i),
        OptionValue::Float(f) => Value::from(f),
        OptionValue::String(s) => Value::String(s),
    }
}
