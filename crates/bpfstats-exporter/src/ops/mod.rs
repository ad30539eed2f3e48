//! Operational HTTP endpoints.
//!
//! - `/healthz`        : liveness
//! - `{exporter.path}` : Prometheus text format (default `/metrics`)

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::registry::Registry;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(registry): State<Arc<Registry>>) -> Response {
    let body = registry.render();

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
