//! Informational routes: GET / and GET /health.

use crate::handlers::common::{health, index};
use axum::{routing::get, Router};

pub fn common_routes() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}
