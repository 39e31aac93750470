use super::normalize::RAW_PAYLOAD_KEY;
use super::*;
use crate::persistence::MemoryStore;
use crate::persistence::test_support::{DisconnectedStore, HangingStore};
use crate::utils::error::StoreError;

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

async fn service_with(documents: Vec<Value>) -> RetrievalService {
    let store = MemoryStore::new();
    for doc in documents {
        store.insert(doc).await.unwrap();
    }
    RetrievalService::new(Arc::new(store), TIMEOUT)
}

#[test]
fn test_normalize_structured_payload() {
    let normalized = normalize_payload(r#"{"heartBeatRate":72,"timestamp":1751816536}"#);
    assert!(normalized.is_structured());
    assert_eq!(
        Value::Object(normalized.into_object()),
        json!({ "heartBeatRate": 72, "timestamp": 1751816536 })
    );
}

#[test]
fn test_normalize_invalid_json_falls_back() {
    let normalized = normalize_payload("not-json-text");
    assert_eq!(
        normalized,
        NormalizedPayload::RawFallback("not-json-text".to_string())
    );
    assert_eq!(
        Value::Object(normalized.into_object()),
        json!({ "raw_payload": "not-json-text" })
    );
}

#[test]
fn test_normalize_non_object_json_falls_back() {
    for raw in ["42", "[1,2,3]", "\"quoted\"", "null", "true", ""] {
        let normalized = normalize_payload(raw);
        assert!(!normalized.is_structured(), "{raw:?} should not be structured");
        let object = normalized.into_object();
        assert_eq!(object.len(), 1);
        assert_eq!(object[RAW_PAYLOAD_KEY], json!(raw));
    }
}

#[tokio::test]
async fn test_get_latest_returns_max_timestamp() {
    let service = service_with(vec![
        json!({ "id": "A", "payload": "{\"x\":1}", "publish_received_at": 100 }),
        json!({ "id": "B", "payload": "bad", "publish_received_at": 200 }),
        json!({ "id": "C", "payload": "{}", "publish_received_at": 150 }),
    ])
    .await;

    match service.get_latest().await {
        RetrievalResult::Found(latest) => {
            assert_eq!(latest.id, "B");
            assert_eq!(latest.publish_received_at, 200);
            assert_eq!(latest.payload, NormalizedPayload::RawFallback("bad".into()));
        }
        other => panic!("Expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_latest_parses_structured_payload() {
    let service = service_with(vec![json!({
        "id": "0006394492CE2D11F4450000265C0000",
        "payload": "{\"heartBeatRate\":72,\"timestamp\":1751816536}",
        "publish_received_at": 1751816543808_i64,
        "topic": "health/heartbeat",
        "clientid": "band-01"
    })])
    .await;

    match service.get_latest().await {
        RetrievalResult::Found(latest) => {
            assert_eq!(latest.id, "0006394492CE2D11F4450000265C0000");
            assert!(latest.payload.is_structured());
            assert_eq!(
                Value::Object(latest.payload.into_object()),
                json!({ "heartBeatRate": 72, "timestamp": 1751816536 })
            );
        }
        other => panic!("Expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_latest_on_empty_store() {
    let service = service_with(Vec::new()).await;
    assert!(matches!(service.get_latest().await, RetrievalResult::Empty));
}

#[tokio::test]
async fn test_get_latest_store_failure_is_unavailable() {
    let service = RetrievalService::new(Arc::new(DisconnectedStore), TIMEOUT);
    assert!(matches!(
        service.get_latest().await,
        RetrievalResult::Unavailable(StoreError::Sled(_))
    ));
}

#[tokio::test]
async fn test_get_latest_times_out() {
    let timeout = Duration::from_millis(50);
    let service = RetrievalService::new(Arc::new(HangingStore), timeout);

    match service.get_latest().await {
        RetrievalResult::Unavailable(StoreError::Timeout(after)) => assert_eq!(after, timeout),
        other => panic!("Expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_latest_is_repeatable() {
    let service = service_with(vec![
        json!({ "id": "A", "payload": "x", "publish_received_at": 1 }),
    ])
    .await;

    for _ in 0..3 {
        match service.get_latest().await {
            RetrievalResult::Found(latest) => assert_eq!(latest.id, "A"),
            other => panic!("Expected Found, got {other:?}"),
        }
    }
}
