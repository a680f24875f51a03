//! JSON output.

use super::record::records;
use super::registry::{FormatError, Formatter};
use crate::highlight::classify::ClassifiedSpan;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, source: &str, spans: &[ClassifiedSpan]) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&records(source, spans))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Span records as pretty-printed JSON"
    }
}
