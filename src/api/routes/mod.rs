pub mod chat;
pub mod corpus;
pub mod health;

use axum::http::{header, Method, StatusCode};
use axum::{routing::get, routing::post, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::state::AppState;
use crate::domain::PipelineError;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.server.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(chat::ask_handler))
        .route("/prepare", post(corpus::prepare_handler))
        .route("/search", post(corpus::search_handler))
}

/// Reports the failed pipeline stage without internal detail.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub stage: &'static str,
    pub error: String,
}

pub fn error_response(error: PipelineError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        PipelineError::Config(_) | PipelineError::Session(_) => StatusCode::BAD_REQUEST,
        PipelineError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        PipelineError::Embedding(_) | PipelineError::Synthesis(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            stage: error.stage(),
            error: error.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_and_stage() {
        let cases = [
            (PipelineError::config("bad k"), StatusCode::BAD_REQUEST, "config"),
            (
                PipelineError::document_not_found("kb.txt"),
                StatusCode::NOT_FOUND,
                "document",
            ),
            (
                PipelineError::embedding("down"),
                StatusCode::BAD_GATEWAY,
                "retrieval",
            ),
            (
                PipelineError::synthesis("down"),
                StatusCode::BAD_GATEWAY,
                "synthesis",
            ),
        ];

        for (error, expected_status, expected_stage) in cases {
            let (status, Json(body)) = error_response(error);
            assert_eq!(status, expected_status);
            let json = serde_json::to_value(&body).unwrap();
            assert_eq!(json["stage"], expected_stage);
            assert!(!json["error"].as_str().unwrap().is_empty());
        }
    }
}
