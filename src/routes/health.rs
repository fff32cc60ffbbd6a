//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is
//! running. Used by the cluster scheduler and load balancers to verify the
//! service is alive.

use axum::Json;
use serde_json::{json, Value};

/// Health check handler.
///
/// Always responds `{"status":"ok"}` - a liveness probe that only checks the
/// process can serve HTTP. It consults no inputs and has no side effects.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
