//! Route tables and full application assembly.

mod accounts;
mod common;

pub use accounts::account_routes;
pub use common::common_routes;

use crate::middleware::{redirect_to_https, security_headers};
use crate::state::AppState;
use axum::{http::Method, middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// The complete application: informational and account routes wrapped in
/// tracing, CORS, HTTPS enforcement, and security-header layers. Security
/// headers are outermost so even redirect responses carry them.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(account_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(state, redirect_to_https))
        .layer(middleware::from_fn(security_headers))
}

/// Cross-origin reads from anywhere: `Access-Control-Allow-Origin: *`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}
