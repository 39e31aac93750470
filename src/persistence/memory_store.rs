//! Process-local message collection.
//!
//! Selected with `store.url = "memory://"`. It starts empty, is filled through
//! the ingest listener and lives as long as the process, which makes it useful
//! for local runs of the HTTP surface and for tests.

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::persistence::record::{MessageRecord, PreparedDocument, RECEIVED_AT_FIELD};
use crate::persistence::{DocumentSink, MessageStore, StoreFuture};
use crate::utils::error::StoreError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn insert(&self, document: Value) -> Result<String, StoreError> {
        let prepared = crate::persistence::prepare_document(document)?;
        let id = prepared.id.clone();
        self.append(prepared).await?;
        Ok(id)
    }
}

fn received_at(document: &Map<String, Value>) -> i64 {
    // prepare_document guarantees the field; the fallback is never hit.
    document
        .get(RECEIVED_AT_FIELD)
        .and_then(Value::as_i64)
        .unwrap_or(i64::MIN)
}

impl MessageStore for MemoryStore {
    fn find_newest(&self) -> StoreFuture<'_, Option<MessageRecord>> {
        Box::pin(async move {
            let documents = self.documents.read().await;
            // max_by_key keeps the last maximum, so ties go to the latest insert
            let newest = match documents.iter().max_by_key(|doc| received_at(doc)) {
                Some(doc) => Some(serde_json::from_value::<MessageRecord>(Value::Object(
                    doc.clone(),
                ))?),
                None => None,
            };
            Ok::<Option<MessageRecord>, StoreError>(newest)
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok::<(), StoreError>(()) })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

impl DocumentSink for MemoryStore {
    fn append(&self, document: PreparedDocument) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.documents.write().await.push(document.body);
            Ok::<(), StoreError>(())
        })
    }
}
