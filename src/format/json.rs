//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::storm::StormResponse;

/// JSON formatter - outputs the response contract as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON response"
    }

    fn format(&self, response: &StormResponse) -> Result<String> {
        Ok(serde_json::to_string_pretty(response)?)
    }
}
