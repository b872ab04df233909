//! Record decoders: turn one raw log line into its identifier.

use serde_json::Value;

/// Extracts the identifier from one log line
///
/// Returning `None` means the line carries no identifier; it still counts
/// toward the file's declared entry count. Decoders never return an empty
/// string: a manifest line cannot carry an empty trailing id.
pub trait RecordDecoder: Send + Sync {
    fn decode(&self, line: &str) -> Option<String>;
}

/// Decoder for JSON-lines logs that reads a top-level string field
///
/// # Example
/// ```
/// use logsync_core::decoder::{JsonFieldDecoder, RecordDecoder};
///
/// let decoder = JsonFieldDecoder::new("uuid");
/// assert_eq!(decoder.decode(r#"{"uuid":"u1","type":"user"}"#), Some("u1".to_string()));
/// assert_eq!(decoder.decode(r#"{"type":"summary"}"#), None);
/// ```
#[derive(Debug, Clone)]
pub struct JsonFieldDecoder {
    field: String,
}

impl JsonFieldDecoder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for JsonFieldDecoder {
    fn default() -> Self {
        Self::new("uuid")
    }
}

impl RecordDecoder for JsonFieldDecoder {
    fn decode(&self, line: &str) -> Option<String> {
        let value: Value = serde_json::from_str(line).ok()?;
        value
            .get(&self.field)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_yields_none() {
        assert_eq!(JsonFieldDecoder::default().decode("not json"), None);
    }

    #[test]
    fn test_non_string_field_yields_none() {
        assert_eq!(JsonFieldDecoder::default().decode(r#"{"uuid":42}"#), None);
    }

    #[test]
    fn test_empty_id_yields_none() {
        assert_eq!(JsonFieldDecoder::default().decode(r#"{"uuid":""}"#), None);
    }

    #[test]
    fn test_custom_field() {
        let decoder = JsonFieldDecoder::new("sessionId");
        assert_eq!(decoder.field(), "sessionId");
        assert_eq!(
            decoder.decode(r#"{"sessionId":"s-1"}"#),
            Some("s-1".to_string())
        );
    }
}
