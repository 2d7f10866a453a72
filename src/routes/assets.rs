use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    error::{AppError, Result},
};

/// Serves photos held by the in-memory backend so the returned image URLs
/// resolve during local runs.
pub async fn get_asset(State(state): State<AppState>, Path(key): Path<String>) -> Result<Response> {
    let storage = state
        .assets
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;

    let object = storage
        .get(&key)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", key)))?;

    Ok(([(header::CONTENT_TYPE, object.content_type)], object.data).into_response())
}
