//! Collection read handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashbase::{DashbaseError, StoredRecord};

use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    /// Maximum records to return.
    pub limit: Option<usize>,
}

/// Response for the collection data endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDataResponse {
    pub success: bool,
    pub collection: String,
    /// Total records in the collection.
    pub record_count: usize,
    /// Records in `data` (may be fewer than `record_count`).
    pub returned: usize,
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetaResponse {
    pub name: String,
    pub record_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn not_found(name: &str) -> ApiError {
    DashbaseError::NotFound(name.to_string()).into()
}

/// GET /api/v1/collection/:name - Records of a collection.
pub async fn get_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<CollectionDataResponse>, ApiError> {
    let collection = state.store.find(&name)?.ok_or_else(|| not_found(&name))?;

    let limit = state.config.effective_limit(query.limit);
    let data: Vec<serde_json::Value> = collection
        .records
        .head(limit)
        .iter()
        .map(StoredRecord::to_document)
        .collect();

    Ok(Json(CollectionDataResponse {
        success: true,
        collection: collection.name().to_string(),
        record_count: collection.record_count(),
        returned: data.len(),
        data,
    }))
}

/// GET /api/v1/collection/:name/meta - Collection metadata.
pub async fn get_collection_meta(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CollectionMetaResponse>, ApiError> {
    let meta = state.store.get_meta(&name)?.ok_or_else(|| not_found(&name))?;

    Ok(Json(CollectionMetaResponse {
        name: meta.name.to_string(),
        record_count: meta.record_count,
        created_at: meta.created_at,
        updated_at: meta.updated_at,
    }))
}

/// GET /api/v1/collections - Collection names, ascending.
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .store
        .list_all()?
        .into_iter()
        .map(|summary| summary.name.to_string())
        .collect();

    Ok(Json(names))
}
