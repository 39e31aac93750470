//! Store doubles for failure paths.

use crate::persistence::{DocumentSink, MessageRecord, MessageStore, PreparedDocument, StoreFuture};
use crate::utils::error::StoreError;

fn refused() -> StoreError {
    StoreError::Sled(sled::Error::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused by 10.0.0.7:27017",
    )))
}

/// Store whose every query fails, as if the connection dropped.
pub(crate) struct DisconnectedStore;

impl MessageStore for DisconnectedStore {
    fn find_newest(&self) -> StoreFuture<'_, Option<MessageRecord>> {
        Box::pin(async { Err::<Option<MessageRecord>, StoreError>(refused()) })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok::<(), StoreError>(()) })
    }

    fn backend(&self) -> &'static str {
        "disconnected"
    }
}

impl DocumentSink for DisconnectedStore {
    fn append(&self, _document: PreparedDocument) -> StoreFuture<'_, ()> {
        Box::pin(async { Err::<(), StoreError>(refused()) })
    }
}

/// Store that is gone before startup: even the reachability check fails.
pub(crate) struct UnreachableStore;

impl MessageStore for UnreachableStore {
    fn find_newest(&self) -> StoreFuture<'_, Option<MessageRecord>> {
        Box::pin(async { Err::<Option<MessageRecord>, StoreError>(refused()) })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Err::<(), StoreError>(refused()) })
    }

    fn backend(&self) -> &'static str {
        "unreachable"
    }
}

impl DocumentSink for UnreachableStore {
    fn append(&self, _document: PreparedDocument) -> StoreFuture<'_, ()> {
        Box::pin(async { Err::<(), StoreError>(refused()) })
    }
}

/// Store that never answers.
pub(crate) struct HangingStore;

impl MessageStore for HangingStore {
    fn find_newest(&self) -> StoreFuture<'_, Option<MessageRecord>> {
        Box::pin(std::future::pending::<Result<Option<MessageRecord>, StoreError>>())
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(std::future::pending::<Result<(), StoreError>>())
    }

    fn backend(&self) -> &'static str {
        "hanging"
    }
}
