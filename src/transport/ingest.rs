//! Ingest listener: the pipeline posts documents, they land in the store this
//! process holds open.
//!
//! The body is one JSON document or an array of them (the batch shape
//! webhook bridges send). Every document is checked before any is written,
//! so a rejected batch leaves the store untouched.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{debug, error, warn};

use crate::persistence::{DocumentSink, PreparedDocument, prepare_document};
use crate::presentation::ErrorBody;
use crate::presentation::response::INTERNAL_ERROR_CODE;
use crate::utils::error::StoreError;

/// Full path of the ingest endpoint.
pub const INGEST_PATH: &str = "/api/v1/mqtt/ingest";

pub const INVALID_DOCUMENT_CODE: &str = "INVALID_DOCUMENT";
pub const INGEST_FAILED_DETAIL: &str = "Internal server error occurred while storing the documents";

/// Body of a `200` answer: how many documents were stored and their ids, in
/// request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestAccepted {
    pub accepted: usize,
    pub ids: Vec<String>,
}

/// Routing table of the ingest listener.
pub fn ingest_router(sink: Arc<dyn DocumentSink>) -> Router {
    Router::new()
        .route(INGEST_PATH, post(handle_ingest))
        .with_state(sink)
}

/// Serves the ingest router on `listener` until `shutdown` resolves.
pub async fn serve_ingest<F>(
    listener: TcpListener,
    sink: Arc<dyn DocumentSink>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, ingest_router(sink))
        .with_graceful_shutdown(shutdown)
        .await
}

// --- REST: POST /api/v1/mqtt/ingest ---

async fn handle_ingest(
    State(sink): State<Arc<dyn DocumentSink>>,
    Json(body): Json<Value>,
) -> Response {
    let documents = match body {
        Value::Array(items) => items,
        single => vec![single],
    };

    let mut prepared = Vec::with_capacity(documents.len());
    for (index, document) in documents.into_iter().enumerate() {
        match prepare_document(document) {
            Ok(document) => prepared.push(document),
            Err(e) => {
                warn!(index, error = %e, "rejected ingest batch");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("document {index}: {e}"),
                    INVALID_DOCUMENT_CODE,
                );
            }
        }
    }

    match store_all(sink.as_ref(), prepared).await {
        Ok(ids) => {
            debug!(accepted = ids.len(), "ingested documents");
            (
                StatusCode::OK,
                Json(IngestAccepted {
                    accepted: ids.len(),
                    ids,
                }),
            )
                .into_response()
        }
        Err((stored, e)) => {
            error!(stored, error = %e, "failed to store ingested documents");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INGEST_FAILED_DETAIL.to_string(),
                INTERNAL_ERROR_CODE,
            )
        }
    }
}

async fn store_all(
    sink: &dyn DocumentSink,
    documents: Vec<PreparedDocument>,
) -> Result<Vec<String>, (usize, StoreError)> {
    let mut ids = Vec::with_capacity(documents.len());
    for document in documents {
        let id = document.id.clone();
        if let Err(e) = sink.append(document).await {
            return Err((ids.len(), e));
        }
        ids.push(id);
    }
    Ok(ids)
}

fn error_response(status: StatusCode, detail: String, code: &str) -> Response {
    let body = ErrorBody {
        detail,
        error_code: Some(code.to_string()),
    };
    (status, Json(body)).into_response()
}
