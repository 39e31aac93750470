//! The `utils` module provides shared definitions used across the
//! `mqtt-latest` service: the error types that cross module boundaries and
//! the tracing setup used by the binary.

pub mod error;
pub mod logging;
