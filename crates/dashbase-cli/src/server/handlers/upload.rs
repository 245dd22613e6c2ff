//! Upload handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use dashbase::{FileType, IngestRequest, SchemaField};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Body of `POST /upload`. Every field is optional here so that a missing
/// file content is reported as a 400 rather than a rejected body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: Option<String>,
    pub file_content: Option<String>,
    pub file_type: Option<String>,
    pub collection_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub collection: String,
    pub schema: Vec<SchemaField>,
    pub record_count: usize,
    pub replaced: bool,
    pub message: String,
}

/// POST /api/v1/upload - Ingest an uploaded dataset.
pub async fn upload(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let Json(body) = payload?;

    let Some(file_content) = body.file_content.filter(|c| !c.trim().is_empty()) else {
        return Err(ApiError::BadRequest("No file content provided".to_string()));
    };

    let request = IngestRequest {
        file_name: body.file_name.unwrap_or_default(),
        file_content,
        file_type: body
            .file_type
            .as_deref()
            .map(FileType::from_declared)
            .unwrap_or_default(),
        collection_name: body.collection_name,
    };

    // Ingest off the async workers; once started it runs to completion even
    // if the client goes away, so a replace is never left half-applied.
    let coordinator = state.coordinator.clone();
    let summary = tokio::task::spawn_blocking(move || coordinator.ingest(request))
        .await
        .map_err(|e| ApiError::Internal(format!("ingest task failed: {}", e)))??;

    let verb = if summary.was_replacement { "replaced" } else { "created" };
    let message = format!(
        "Collection '{}' {} with {} records",
        summary.collection_name, verb, summary.record_count
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            collection: summary.collection_name.to_string(),
            schema: summary.schema,
            record_count: summary.record_count,
            replaced: summary.was_replacement,
            message,
        }),
    ))
}
