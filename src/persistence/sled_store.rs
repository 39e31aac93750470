//! Message collection backed by `sled`
//!
//! Each collection is a `sled` tree. Keys are the record's
//! `publish_received_at` followed by its id, so iteration yields records in
//! chronological order and the newest record is simply the last key:
//!
//! ```text
//! [ 8 bytes: timestamp, big-endian, sign bit flipped ][ id bytes ]
//! ```
//!
//! Flipping the sign bit keeps negative timestamps ordered before positive
//! ones under byte-wise comparison. Values are the full JSON document as the
//! pipeline posted it, extra fields included. A second document with the same
//! timestamp and id overwrites the first.

use std::path::Path;

use sled::{Db, Tree};

use crate::persistence::record::{MessageRecord, PreparedDocument};
use crate::persistence::{DocumentSink, MessageStore, StoreFuture};
use crate::utils::error::StoreError;

#[derive(Clone)]
pub struct SledStore {
    db: Db,
    tree: Tree,
    collection: String,
}

impl SledStore {
    /// Open or create a sled database at `path` and the tree for `collection`.
    pub fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self, StoreError> {
        Self::from_db(sled::open(path)?, collection)
    }

    /// Use an already open database; several collections may share one `Db`.
    pub fn from_db(db: Db, collection: &str) -> Result<Self, StoreError> {
        let tree = db.open_tree(collection)?;
        Ok(Self {
            db,
            tree,
            collection: collection.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn insert(&self, document: serde_json::Value) -> Result<String, StoreError> {
        let prepared = crate::persistence::prepare_document(document)?;
        Self::put_blocking(&self.tree, &prepared)?;
        Ok(prepared.id)
    }

    #[cfg(test)]
    pub(crate) fn raw_tree(&self) -> &Tree {
        &self.tree
    }

    fn put_blocking(tree: &Tree, document: &PreparedDocument) -> Result<(), StoreError> {
        let key = record_key(document.publish_received_at, &document.id);
        tree.insert(key, serde_json::to_vec(&document.body)?)?;
        Ok(())
    }

    fn newest_blocking(tree: &Tree) -> Result<Option<MessageRecord>, StoreError> {
        match tree.last()? {
            Some((_, value)) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }
}

/// Builds the ordering key for a record.
pub(crate) fn record_key(publish_received_at: i64, id: &str) -> Vec<u8> {
    let ordered = (publish_received_at as u64) ^ (1 << 63);
    let mut key = Vec::with_capacity(8 + id.len());
    key.extend_from_slice(&ordered.to_be_bytes());
    key.extend_from_slice(id.as_bytes());
    key
}

impl MessageStore for SledStore {
    fn find_newest(&self) -> StoreFuture<'_, Option<MessageRecord>> {
        let tree = self.tree.clone();
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || Self::newest_blocking(&tree)).await {
                Ok(newest) => newest,
                Err(e) => Err(StoreError::Task(e)),
            }
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        let tree = self.tree.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || tree.first().map(|_| ())).await??;
            Ok::<(), StoreError>(())
        })
    }

    fn flush(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.db.flush_async().await?;
            Ok::<(), StoreError>(())
        })
    }

    fn backend(&self) -> &'static str {
        "sled"
    }
}

impl DocumentSink for SledStore {
    fn append(&self, document: PreparedDocument) -> StoreFuture<'_, ()> {
        let tree = self.tree.clone();
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || Self::put_blocking(&tree, &document)).await {
                Ok(written) => written,
                Err(e) => Err(StoreError::Task(e)),
            }
        })
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .field("collection", &self.collection)
            .finish()
    }
}
