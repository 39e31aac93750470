//! The stored message document, seen through the three fields the service
//! answers with.
//!
//! Producers write documents with many more fields (`topic`, `clientid`,
//! `qos`, `flags`, `peerhost`, ...). Those stay in the store untouched and are
//! skipped when a document is read into a [`MessageRecord`].

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::utils::error::StoreError;

pub const ID_FIELD: &str = "id";
pub const RECEIVED_AT_FIELD: &str = "publish_received_at";

/// A message record as read from the store.
///
/// # Fields
///
/// - `id` - Opaque identifier assigned by the pipeline or the store.
/// - `payload` - Message body as text. It is usually JSON but nothing
///   guarantees it; a missing or `null` payload reads as `""` and a non-string
///   JSON value reads as its JSON text.
/// - `publish_received_at` - Milliseconds since the UNIX epoch at which the
///   pipeline received the message. The only ordering key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    #[serde(default, deserialize_with = "payload_text")]
    pub payload: String,
    pub publish_received_at: i64,
}

fn payload_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A document accepted for storage, with its ordering key pulled out.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub id: String,
    pub publish_received_at: i64,
    pub body: Map<String, Value>,
}

/// Checks a pipeline document before it is written: it must be an object
/// with an integer `publish_received_at`. A missing `id` is assigned here.
pub fn prepare_document(document: Value) -> Result<PreparedDocument, StoreError> {
    let Value::Object(mut body) = document else {
        return Err(StoreError::InvalidField("<document>"));
    };

    let publish_received_at = body
        .get(RECEIVED_AT_FIELD)
        .and_then(Value::as_i64)
        .ok_or(StoreError::InvalidField(RECEIVED_AT_FIELD))?;

    let id = match body.get(ID_FIELD) {
        Some(Value::String(id)) => id.clone(),
        Some(_) => return Err(StoreError::InvalidField(ID_FIELD)),
        None => {
            let id = Uuid::new_v4().simple().to_string().to_uppercase();
            body.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    };

    Ok(PreparedDocument {
        id,
        publish_received_at,
        body,
    })
}
