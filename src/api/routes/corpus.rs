use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::routes::{error_response, ErrorResponse};
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PrepareRequest {
    pub source_id: String,
}

#[derive(Debug, Serialize)]
pub struct PrepareResponse {
    pub source_id: String,
    pub chunks_indexed: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultResponse {
    pub chunk_id: Uuid,
    pub source_id: String,
    pub text: String,
    pub score: f32,
}

pub async fn prepare_handler(
    State(state): State<AppState>,
    Json(request): Json<PrepareRequest>,
) -> Result<Json<PrepareResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.indexer.prepare(&request.source_id).await {
        Ok(chunks_indexed) => Ok(Json(PrepareResponse {
            source_id: request.source_id,
            chunks_indexed,
        })),
        Err(e) => {
            tracing::error!(error = %e, stage = e.stage(), "prepare failed");
            Err(error_response(e))
        }
    }
}

/// Raw retrieval without synthesis, for debugging what grounds an answer.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResultResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let results = match request.limit {
        Some(top_k) => state.retriever.retrieve_top_k(&request.query, top_k).await,
        None => state.retriever.retrieve(&request.query).await,
    };

    match results {
        Ok(results) => Ok(Json(
            results
                .into_iter()
                .map(|r| SearchResultResponse {
                    chunk_id: r.chunk.id,
                    source_id: r.chunk.source_id,
                    text: r.chunk.text,
                    score: r.score,
                })
                .collect(),
        )),
        Err(e) => {
            tracing::error!(error = %e, stage = e.stage(), "search failed");
            Err(error_response(e))
        }
    }
}
