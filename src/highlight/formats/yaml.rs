//! YAML output.

use super::record::records;
use super::registry::{FormatError, Formatter};
use crate::highlight::classify::ClassifiedSpan;

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, source: &str, spans: &[ClassifiedSpan]) -> Result<String, FormatError> {
        serde_yaml::to_string(&records(source, spans))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Span records as YAML"
    }
}
