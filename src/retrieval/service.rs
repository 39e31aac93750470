use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::config::StoreSettings;
use crate::persistence::{MessageRecord, MessageStore};
use crate::retrieval::normalize::{NormalizedPayload, normalize_payload};
use crate::utils::error::StoreError;

/// The newest record, narrowed to the fields the endpoint answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestMessage {
    pub id: String,
    pub payload: NormalizedPayload,
    pub publish_received_at: i64,
}

impl LatestMessage {
    fn from_record(record: MessageRecord) -> Self {
        let payload = normalize_payload(&record.payload);
        Self {
            id: record.id,
            payload,
            publish_received_at: record.publish_received_at,
        }
    }
}

/// Outcome of one `get_latest` call.
#[derive(Debug)]
pub enum RetrievalResult {
    Found(LatestMessage),
    /// The store answered and the collection holds no records.
    Empty,
    /// The store could not answer. The cause is for logs only.
    Unavailable(StoreError),
}

/// Looks up the most recently received message.
///
/// Holds the store handle for the life of the process; cloning the service
/// shares the handle.
#[derive(Clone)]
pub struct RetrievalService {
    store: Arc<dyn MessageStore>,
    query_timeout: Duration,
}

impl RetrievalService {
    pub fn new(store: Arc<dyn MessageStore>, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
        }
    }

    pub fn from_settings(store: Arc<dyn MessageStore>, settings: &StoreSettings) -> Self {
        Self::new(store, settings.query_timeout())
    }

    /// Fetches the record with the greatest `publish_received_at`.
    ///
    /// One store query, bounded by the configured timeout. Dropping the
    /// returned future abandons the query.
    pub async fn get_latest(&self) -> RetrievalResult {
        let outcome = tokio::time::timeout(self.query_timeout, self.store.find_newest())
            .await
            .unwrap_or_else(|_| Err(StoreError::Timeout(self.query_timeout)));

        match outcome {
            Ok(Some(record)) => {
                let latest = LatestMessage::from_record(record);
                info!(
                    id = %latest.id,
                    publish_received_at = latest.publish_received_at,
                    received = ?DateTime::<Utc>::from_timestamp_millis(latest.publish_received_at),
                    structured = latest.payload.is_structured(),
                    "found latest document"
                );
                RetrievalResult::Found(latest)
            }
            Ok(None) => {
                warn!(backend = self.store.backend(), "no documents found in the collection");
                RetrievalResult::Empty
            }
            Err(e) => {
                error!(backend = self.store.backend(), error = %e, "error fetching latest document");
                RetrievalResult::Unavailable(e)
            }
        }
    }
}

impl std::fmt::Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("store", &self.store.backend())
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}
