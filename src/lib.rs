//! # mqtt-latest
//!
//! `mqtt-latest` is a small HTTP service that answers one question about an
//! MQTT ingestion store: which message was received last? The query surface
//! is read-only; the pipeline feeds the store through a separate ingest
//! listener.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `config`: Loads settings from `config/default`, `.env` and `MQTT_LATEST_*` variables.
//! - `persistence`: The `MessageStore` / `DocumentSink` boundary and its `sled` and in-memory backends.
//! - `retrieval`: Finds the newest record and normalizes its payload.
//! - `presentation`: Maps a retrieval outcome to a status and a response body.
//! - `transport`: The `axum` query router and the ingest listener the pipeline posts to.
//! - `startup`: Opens and checks the store, binds the listeners, runs until shutdown.
//! - `utils`: Error types and logging setup.

pub mod config;
pub mod persistence;
pub mod presentation;
pub mod retrieval;
pub mod startup;
pub mod transport;
pub mod utils;
