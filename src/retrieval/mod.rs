//! The `retrieval` module answers "which message arrived last".
//!
//! [`RetrievalService`] asks the store for the record with the greatest
//! `publish_received_at`, normalizes its payload and folds every store outcome
//! into a [`RetrievalResult`]. It performs no I/O of its own beyond that one
//! bounded store call and keeps no state between requests.

pub mod normalize;
pub mod service;

pub use normalize::{NormalizedPayload, normalize_payload};
pub use service::{LatestMessage, RetrievalResult, RetrievalService};

#[cfg(test)]
mod tests;
