//! Axum router wiring for the exposition listener.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{ops, registry::Registry};

pub const HEALTHZ_PATH: &str = "/healthz";

/// `metrics_path` must start with `/` (checked by `ExporterConfig::validate`).
pub fn build_router(registry: Arc<Registry>, metrics_path: &str) -> Router {
    Router::new()
        .route(HEALTHZ_PATH, get(ops::healthz))
        .route(metrics_path, get(ops::metrics))
        .with_state(registry)
}
