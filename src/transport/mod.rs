//! The `transport` module exposes the service over HTTP.
//!
//! Two listeners: the query server, whose every response comes from
//! [`crate::presentation::render`], and the ingest listener the pipeline
//! posts documents to. They share one opened store.

pub mod http;
pub mod ingest;

pub use http::{LATEST_DOCUMENT_PATH, router, serve};
pub use ingest::{INGEST_PATH, IngestAccepted, ingest_router, serve_ingest};
