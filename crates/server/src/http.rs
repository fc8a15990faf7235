//! HTTP surface of the orchestrator.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::OrchestratorError;
use crate::orchestrator::{FindResponse, RecipeOrchestrator};

pub const DEFAULT_TOP_K: usize = 5;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Body of `POST /find_recipes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindRequest {
    pub ingredients: Vec<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Error body shared by every failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Failing stage, absent for invalid requests
    pub stage: Option<String>,
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), "find_recipes failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "find_recipes failed: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            stage: self.stage().map(|stage| stage.name().to_string()),
        };
        (status, Json(body)).into_response()
    }
}

async fn find_recipes(
    State(orchestrator): State<RecipeOrchestrator>,
    payload: Result<Json<FindRequest>, JsonRejection>,
) -> Result<Json<FindResponse>, OrchestratorError> {
    let Json(request) =
        payload.map_err(|rejection| OrchestratorError::InvalidRequest(rejection.body_text()))?;

    let response = orchestrator
        .find_recipes(&request.ingredients, request.top_k)
        .await?;
    Ok(Json(response))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the service router
pub fn router(orchestrator: RecipeOrchestrator) -> Router {
    Router::new()
        .route("/find_recipes", post(find_recipes))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(orchestrator)
}
