//! Error handling module for the DonorTrack client core.
//!
//! Provides one centralized error type covering local validation, the backend
//! API contract, and session persistence.

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
///
/// The backend reports the same codes in its error envelopes, so they double
/// as the mapping table in `api::client`.
#[allow(dead_code)]
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const HTTP_ERROR: &str = "HTTP_ERROR";
    pub const API_ERROR: &str = "API_ERROR";
    pub const BAD_RESPONSE: &str = "BAD_RESPONSE";
    pub const SESSION_ERROR: &str = "SESSION_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Session token missing, expired, or rejected
    Unauthorized(String),
    /// Resource not found on the backend
    NotFound(String),
    /// Local form validation or backend-rejected input
    Validation(String),
    /// Error envelope returned by the backend
    Api { code: String, message: String },
    /// Transport-level failure (connect, timeout, TLS)
    Http(String),
    /// Response body did not match the contract
    BadResponse(String),
    /// Local session store failure
    Session(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Api { code, .. } => code,
            AppError::Http(_) => codes::HTTP_ERROR,
            AppError::BadResponse(_) => codes::BAD_RESPONSE,
            AppError::Session(_) => codes::SESSION_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Http(msg) => msg.clone(),
            AppError::BadResponse(msg) => msg.clone(),
            AppError::Session(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP error: {:?}", err);
        AppError::Http(format!("HTTP error: {}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Session store error: {:?}", err);
        AppError::Session(format!("Session store error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadResponse(format!("JSON error: {}", err))
    }
}

/// Error details in the backend response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorDetails {
    /// Map a backend error envelope onto the client error taxonomy.
    pub fn into_app_error(self) -> AppError {
        match self.code.as_str() {
            codes::UNAUTHORIZED => AppError::Unauthorized(self.message),
            codes::NOT_FOUND => AppError::NotFound(self.message),
            codes::VALIDATION_ERROR => AppError::Validation(self.message),
            _ => AppError::Api {
                code: self.code,
                message: self.message,
            },
        }
    }
}
