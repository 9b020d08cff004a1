use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::collections::CollectionError;
use super::AppState;

/// Error body for collection routes
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for CollectionError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            CollectionError::UnknownCollection(_) => (StatusCode::NOT_FOUND, "unknown_collection"),
            CollectionError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            CollectionError::ReadOnly(_) => (StatusCode::METHOD_NOT_ALLOWED, "read_only"),
            CollectionError::NotAnObject => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_body"),
        };
        let body = ErrorBody {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Value>>, CollectionError> {
    state.collections.list(&collection).await.map(Json)
}

pub async fn get_one(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, CollectionError> {
    state.collections.get(&collection, &id).await.map(Json)
}

pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), CollectionError> {
    let record = state.collections.create(&collection, body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn replace(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, CollectionError> {
    state.collections.replace(&collection, &id, body).await.map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, CollectionError> {
    state.collections.delete(&collection, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
