//! API error taxonomy.
//!
//! Every failure a handler can produce is one of these variants. Validation
//! and auth errors carry client-facing detail; storage, upstream and email
//! failures keep their detail server-side and collapse to a generic message
//! when rendered (see `conversion.rs`).

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// One failed field in a validation error, as returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// All errors a request or socket handler can surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input. Rendered as 400 with an `errors` array of
    /// `{path, message}` pairs.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Request-level failure with a single client-facing message (invalid
    /// credentials, duplicate email, invalid reset token). Rendered as 400.
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid or expired identity token. Rendered as 401.
    #[error("{0}")]
    Auth(String),

    /// Rendered as 404.
    #[error("{0}")]
    NotFound(String),

    /// Persistence failure. Detail is logged, never returned to the client.
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Third-party API failure. Detail is logged, never returned.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Outbound email failure. Detail is logged, never returned.
    #[error("email delivery failed: {0}")]
    Email(String),

    /// Token signing failure (verification failures map to `Auth` instead).
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failure.
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// JSON serialization failure while building a response or event payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Validation error for a single field.
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(path, message)])
    }

    /// The HTTP status this error renders as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_)
            | Self::Upstream(_)
            | Self::Email(_)
            | Self::Token(_)
            | Self::Hash(_)
            | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
