use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub indexed_chunks: usize,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Ready once the index holds at least one chunk.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    let indexed_chunks = state.retriever.indexed_chunks().await.map_err(|e| {
        tracing::error!(error = %e, "readiness check failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let status = if indexed_chunks > 0 { "ready" } else { "empty" };
    Ok(Json(ReadinessResponse {
        status: status.into(),
        indexed_chunks,
    }))
}
