//! Serde-backed formats
//!
//! Both render the full [`LexResult`]: `tokens`, `errors`, `final_depth` and `max_depth`.
//! Spans serialize as `{start, end}` objects; positions are left out when not tracked.

use super::registry::{FormatError, Formatter};
use crate::macrolex::engine::LexResult;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, result: &LexResult<'_>) -> Result<String, FormatError> {
        serde_json::to_string_pretty(result)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, result: &LexResult<'_>) -> Result<String, FormatError> {
        serde_yaml::to_string(result).map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "YAML document"
    }
}
