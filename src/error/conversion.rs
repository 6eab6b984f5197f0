//! Conversion of [`ApiError`] into HTTP responses.
//!
//! Response bodies follow the shapes clients already parse:
//! validation failures return `{"errors": [{"path", "message"}, ..]}`, every
//! other failure returns `{"message": ".."}`. Internal failures are logged
//! with their detail and answered with a generic message so nothing about
//! storage or upstream services leaks.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::Validation(fields) => json!({ "errors": fields }),
            ApiError::BadRequest(message)
            | ApiError::Auth(message)
            | ApiError::NotFound(message) => json!({ "message": message }),
            other => {
                tracing::error!(error = %other, "request failed");
                json!({ "message": "Something went wrong" })
            }
        };

        (status, Json(body)).into_response()
    }
}
