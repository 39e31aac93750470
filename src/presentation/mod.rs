//! The `presentation` module turns a [`RetrievalResult`] into the
//! `(status, body)` pair clients see, independent of any transport.
//!
//! | Result        | Status | Body                                              |
//! |---------------|--------|---------------------------------------------------|
//! | `Found`       | 200    | `{ id, payload, publish_received_at }`            |
//! | `Empty`       | 404    | `{ detail: "No documents found", error_code }`    |
//! | `Unavailable` | 500    | `{ detail: "Internal server error…", error_code }` |
//!
//! The store error carried by `Unavailable` is dropped here; it has already
//! been logged by the retrieval service.
//!
//! [`RetrievalResult`]: crate::retrieval::RetrievalResult

pub mod response;

pub use response::{ErrorBody, LatestDocumentBody, Rendered, ResponseBody, ResponseStatus, render};

#[cfg(test)]
mod tests;
