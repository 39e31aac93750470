use std::future::Future;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::presentation::{Rendered, ResponseStatus, render};
use crate::retrieval::RetrievalService;

/// Full path of the latest-document endpoint.
pub const LATEST_DOCUMENT_PATH: &str = "/api/v1/mqtt/latest-mqtt-document";

#[derive(Clone)]
struct AppState {
    service: RetrievalService,
}

/// Routing table: `/api/v1` → `/mqtt` → `/latest-mqtt-document`.
pub fn router(service: RetrievalService) -> Router {
    let mqtt = Router::new().route("/latest-mqtt-document", get(handle_latest_document));
    let api_v1 = Router::new().nest("/mqtt", mqtt);

    Router::new()
        .nest("/api/v1", api_v1)
        .with_state(AppState { service })
}

/// Serves the router on `listener` until `shutdown` resolves, then lets
/// in-flight requests finish.
pub async fn serve<F>(
    listener: TcpListener,
    service: RetrievalService,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

// --- REST: GET /api/v1/mqtt/latest-mqtt-document ---

async fn handle_latest_document(State(state): State<AppState>) -> Response {
    render(state.service.get_latest().await).into_response()
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        let status = match self.status {
            ResponseStatus::Ok => StatusCode::OK,
            ResponseStatus::NotFound => StatusCode::NOT_FOUND,
            ResponseStatus::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.body)).into_response()
    }
}
