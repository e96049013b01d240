//! The span record.
//!
//! A span is one unit of distributed-trace work. Decoders produce spans,
//! sinks consume them; the ingest worker itself never interprets the fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single trace span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Trace identifier, hex-encoded
    pub trace_id: String,
    /// Span identifier, hex-encoded
    pub id: String,
    /// Parent span identifier (absent for root spans)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Operation name
    pub name: String,
    /// Start time in microseconds since epoch (if recorded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_micros: Option<i64>,
    /// Duration in microseconds (if recorded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_micros: Option<i64>,
    /// Key-value annotations
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

impl Span {
    /// Create a span with the required identifiers and no timing or tags.
    pub fn new(
        trace_id: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            id: id.into(),
            parent_id: None,
            name: name.into(),
            timestamp_micros: None,
            duration_micros: None,
            tags: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let span = Span::new("a1", "b2", "get /users");
        let json = serde_json::to_string(&span).unwrap();
        assert!(!json.contains("parent_id"));
        assert!(!json.contains("tags"));

        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(back, span);
    }
}
