use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::routes::{error_response, ErrorResponse};
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub session_id: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: String,
    pub answer: String,
    pub used_chunks: Vec<Uuid>,
}

pub async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.session_id.trim().is_empty() {
        return Err(error_response(crate::domain::PipelineError::session(
            "session_id must not be empty",
        )));
    }

    match state
        .pipeline
        .ask(&request.session_id, &request.question)
        .await
    {
        Ok(answer) => Ok(Json(AskResponse {
            session_id: request.session_id,
            answer: answer.text,
            used_chunks: answer.used_chunks,
        })),
        Err(e) => {
            tracing::error!(error = %e, stage = e.stage(), "ask failed");
            Err(error_response(e))
        }
    }
}
