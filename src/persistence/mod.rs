//! The `persistence` module is the boundary to the document store that the
//! ingestion pipeline writes into.
//!
//! The retrieval core only needs one primitive from it, "the newest record by
//! `publish_received_at`", expressed by the [`MessageStore`] trait. The
//! ingest listener needs the other side, [`DocumentSink`]. Two backends
//! implement both:
//!
//! - [`SledStore`]: an embedded `sled` database where each collection is a
//!   tree keyed by timestamp, so the newest record is the last key.
//! - [`MemoryStore`]: a process-local collection, used for local runs and
//!   tests.
//!
//! The backend is chosen from the single `store.url` setting and opened once.
//! `sled` locks its directory for the life of the process, so every write
//! goes through the [`StoreHandle`] this process holds.

pub mod memory_store;
pub mod record;
pub mod sled_store;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::StoreSettings;
use crate::utils::error::StoreError;

pub use memory_store::MemoryStore;
pub use record::{MessageRecord, PreparedDocument, prepare_document};
pub use sled_store::SledStore;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Read side of the message collection.
pub trait MessageStore: Send + Sync {
    /// One record with the greatest `publish_received_at`, or `None` when the
    /// collection is empty. Ties resolve in the backend's own order.
    fn find_newest(&self) -> StoreFuture<'_, Option<MessageRecord>>;

    /// Cheap reachability check run once at startup.
    fn ping(&self) -> StoreFuture<'_, ()>;

    /// Persist anything buffered before the process exits.
    fn flush(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok::<(), StoreError>(()) })
    }

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Write side of the message collection, fed by the ingest listener.
pub trait DocumentSink: Send + Sync {
    /// Store one document that already passed [`prepare_document`].
    fn append(&self, document: PreparedDocument) -> StoreFuture<'_, ()>;
}

/// Read and write handles onto one opened backend.
#[derive(Clone)]
pub struct StoreHandle {
    pub reader: Arc<dyn MessageStore>,
    pub sink: Arc<dyn DocumentSink>,
}

impl StoreHandle {
    pub fn new<S>(store: S) -> Self
    where
        S: MessageStore + DocumentSink + 'static,
    {
        let store = Arc::new(store);
        Self {
            reader: store.clone(),
            sink: store,
        }
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("backend", &self.reader.backend())
            .finish()
    }
}

/// Parsed form of the `store.url` setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    Sled(PathBuf),
    Memory,
}

impl FromStr for StoreUrl {
    type Err = StoreError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        if let Some(path) = url.strip_prefix("sled://") {
            if path.is_empty() {
                return Err(StoreError::UnsupportedUrl(url.to_string()));
            }
            return Ok(StoreUrl::Sled(PathBuf::from(path)));
        }
        if url == "memory://" || url == "memory" {
            return Ok(StoreUrl::Memory);
        }
        Err(StoreError::UnsupportedUrl(url.to_string()))
    }
}

/// Opens the backend named by `settings.url` for `settings.collection`.
pub async fn open_store(settings: &StoreSettings) -> Result<StoreHandle, StoreError> {
    match settings.url.parse::<StoreUrl>()? {
        StoreUrl::Sled(path) => {
            let collection = settings.collection.clone();
            let store =
                tokio::task::spawn_blocking(move || SledStore::open(&path, &collection)).await??;
            Ok(StoreHandle::new(store))
        }
        StoreUrl::Memory => Ok(StoreHandle::new(MemoryStore::new())),
    }
}

#[cfg(test)]
pub(crate) mod test_support;
