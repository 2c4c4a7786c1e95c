use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::pipeline::UploadError;

// ============================================================================
// Success envelopes
// ============================================================================

/// `{success: true, data}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Success<T> {
    pub fn json(data: T) -> Json<Success<T>> {
        Json(Success {
            success: true,
            data,
        })
    }
}

/// `{success: true, data: [...], count}`
#[derive(Debug, Serialize)]
pub struct Listing<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T: Serialize> Listing<T> {
    pub fn json(data: Vec<T>) -> Json<Listing<T>> {
        Json(Listing {
            success: true,
            count: data.len(),
            data,
        })
    }
}

/// `{success: true, data, message}`
#[derive(Debug, Serialize)]
pub struct WithMessage<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> WithMessage<T> {
    pub fn json(data: T, message: impl Into<String>) -> Json<WithMessage<T>> {
        Json(WithMessage {
            success: true,
            data,
            message: message.into(),
        })
    }
}

// ============================================================================
// Failure envelope
// ============================================================================

/// `{success: false, error}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

impl Failure {
    pub fn response(status_code: StatusCode, error: impl Into<String>) -> (StatusCode, Json<Failure>) {
        (
            status_code,
            Json(Failure {
                success: false,
                error: error.into(),
            }),
        )
    }
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// Either a client failure (4xx) or a server error (5xx).
/// Both render as the `{success: false, error}` envelope.
#[derive(Debug)]
pub enum ApiError {
    Fail(StatusCode, String),
    Error(StatusCode, String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Fail(code, msg) | ApiError::Error(code, msg) => {
                Failure::response(code, msg).into_response()
            }
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::NOT_FOUND, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Error(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Fail(code, _) | ApiError::Error(code, _) => *code,
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        if e.is_client_error() {
            tracing::debug!(error = %e, "Upload rejected");
            ApiError::bad_request(e.to_string())
        } else {
            tracing::error!(error = ?e, "Upload failed");
            ApiError::internal(e.to_string())
        }
    }
}
