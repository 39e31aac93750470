use serde_json::{Map, Value};

/// Key under which an unparseable payload is returned.
pub const RAW_PAYLOAD_KEY: &str = "raw_payload";

/// A payload after normalization.
///
/// Producers do not promise JSON. A payload that parses as a JSON object is
/// `Structured`; anything else (invalid JSON, or JSON that is not an object)
/// is kept verbatim as `RawFallback`.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedPayload {
    Structured(Map<String, Value>),
    RawFallback(String),
}

impl NormalizedPayload {
    pub fn is_structured(&self) -> bool {
        matches!(self, NormalizedPayload::Structured(_))
    }

    /// The object handed to clients: the parsed map, or
    /// `{ "raw_payload": <original text> }`.
    pub fn into_object(self) -> Map<String, Value> {
        match self {
            NormalizedPayload::Structured(map) => map,
            NormalizedPayload::RawFallback(raw) => {
                let mut map = Map::with_capacity(1);
                map.insert(RAW_PAYLOAD_KEY.to_string(), Value::String(raw));
                map
            }
        }
    }
}

/// Normalizes a raw payload. Never fails.
pub fn normalize_payload(raw: &str) -> NormalizedPayload {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => NormalizedPayload::Structured(map),
        _ => NormalizedPayload::RawFallback(raw.to_string()),
    }
}
