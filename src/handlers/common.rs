//! Root and health endpoints: static informational responses.

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// GET / — service metadata: name, version, and where the accounts live.
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Account REST API Service",
        "version": env!("CARGO_PKG_VERSION"),
        "paths": { "accounts": "/accounts" },
    }))
}

/// GET /health
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "OK" })
}
