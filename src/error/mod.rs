//! Centralized API error handling for Graso
//!
//! Core operations return typed errors; this module is the only place they
//! are turned into HTTP status codes and JSON error bodies.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::services::ServiceError;
use crate::uploads::UploadError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authorization token missing or invalid")]
    MissingAuth,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Invalid signature or nonce")]
    InvalidSignatureOrNonce,

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in the response
#[derive(Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingAuth => "MISSING_AUTH",
            ApiError::TokenExpired => "TOKEN_EXPIRED",
            ApiError::TokenInvalid => "TOKEN_INVALID",
            ApiError::InvalidSignatureOrNonce | ApiError::InvalidSignature(_) => {
                "INVALID_SIGNATURE"
            }
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingAuth | ApiError::TokenExpired | ApiError::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InvalidSignatureOrNonce
            | ApiError::InvalidSignature(_)
            | ApiError::BadRequest(_)
            | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalError(_) | ApiError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Log server errors with detail, keep it out of the response body
        let message = match &self {
            ApiError::InternalError(_) | ApiError::DatabaseError(_) => {
                tracing::error!(error = %self, code = %error_code, "Server error occurred");
                "Internal server error".to_string()
            }
            _ => {
                tracing::debug!(error = %self, code = %error_code, "Client error occurred");
                self.to_string()
            }
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: error_code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidWalletAddress(msg) => ApiError::BadRequest(msg),
            AuthError::NonceNotFound => {
                ApiError::NotFound("No nonce issued for this wallet".to_string())
            }
            AuthError::Conflict(msg) => ApiError::Conflict(msg),
            AuthError::InvalidSignature(msg) => ApiError::InvalidSignature(msg),
            AuthError::InvalidSignatureOrNonce => ApiError::InvalidSignatureOrNonce,
            AuthError::TokenExpired => ApiError::TokenExpired,
            AuthError::TokenInvalid(_) => ApiError::TokenInvalid,
            AuthError::Storage(msg) => ApiError::DatabaseError(msg),
            AuthError::TokenError(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => ApiError::ValidationError(e.to_string()),
            ServiceError::NotFound(what) => ApiError::NotFound(what),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Upload(e) => e.into(),
            ServiceError::Storage(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge(_) => ApiError::PayloadTooLarge(err.to_string()),
            UploadError::Empty | UploadError::UnsupportedType(_) => {
                ApiError::BadRequest(err.to_string())
            }
            UploadError::Io(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl ApiError {
    /// Map an extractor failure onto the error body used everywhere else
    fn from_rejection(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(body_text)
        } else {
            ApiError::BadRequest(body_text)
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::from_rejection(err.status(), err.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;
