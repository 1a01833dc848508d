use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiResponse;
use crate::state::AppState;

/// Health check. Reports `degraded` when the database does not answer
/// within five seconds.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status")
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Value>> {
    let db_ok = tokio::time::timeout(
        Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(&state.pool),
    )
    .await
    .map(|result| result.is_ok())
    .unwrap_or(false);

    Json(ApiResponse::success(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
    })))
}
