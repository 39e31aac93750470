//! Error types shared by the store backends and the process entrypoint.
//!
//! `StoreError` never reaches an HTTP response body: the retrieval service
//! logs it and the presentation adapter replaces it with a generic message.

use std::time::Duration;

use ::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unsupported store url '{0}' (expected sled://<path> or memory://)")]
    UnsupportedUrl(String),

    #[error("sled: {0}")]
    Sled(#[from] sled::Error),

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("document field '{0}' is missing or has the wrong type")]
    InvalidField(&'static str),

    #[error("store query timed out after {0:?}")]
    Timeout(Duration),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors that abort the process before or while serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}
