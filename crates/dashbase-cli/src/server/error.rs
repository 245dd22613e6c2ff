//! API error types and handling.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use dashbase::DashbaseError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Body that could not be read as the expected JSON.
    InvalidBody(String),
    /// Internal server error.
    Internal(String),
    /// Error from the dashbase library.
    Dashbase(DashbaseError),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn parts(self) -> (StatusCode, String, Option<String>) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::InvalidBody(details) => (
                StatusCode::BAD_REQUEST,
                "Invalid request body".to_string(),
                Some(details),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
                Some(msg),
            ),
            ApiError::Dashbase(e) => match e {
                DashbaseError::NotFound(name) => (
                    StatusCode::NOT_FOUND,
                    format!("Collection '{}' not found", name),
                    None,
                ),
                e if e.is_user_error() => (
                    StatusCode::BAD_REQUEST,
                    "Failed to process file".to_string(),
                    Some(e.to_string()),
                ),
                e => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Some(e.to_string()),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        if status.is_server_error() {
            tracing::error!(%error, details = details.as_deref().unwrap_or(""), "request failed");
        }

        (
            status,
            Json(ErrorResponse {
                success: false,
                error,
                details,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<DashbaseError> for ApiError {
    fn from(err: DashbaseError) -> Self {
        ApiError::Dashbase(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::InvalidBody(details) => write!(f, "Invalid request body: {}", details),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Dashbase(e) => write!(f, "Dashbase error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
