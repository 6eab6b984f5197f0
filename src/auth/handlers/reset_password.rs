//! POST /auth/reset-password — set a new password using a reset token.

use axum::{extract::State, response::Json};

use crate::auth::handlers::types::{MessageResponse, ResetPasswordRequest};
use crate::auth::tokens::verify;
use crate::auth::users::{get_user_by_id, update_password};
use crate::error::{ApiError, FieldError};
use crate::server::state::AppState;

fn validate(request: &ResetPasswordRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if request.token.is_empty() {
        errors.push(FieldError::new("token", "Token is required"));
    }
    if request.password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Verify the reset token, then store a fresh bcrypt hash for the account it
/// names. An invalid or expired token answers 400, not 401 — the caller is
/// not presenting a session, just a single-use link that went stale.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate(&request)?;

    let claims = verify(&request.token, state.config.secret_key.as_bytes())
        .map_err(|_| ApiError::BadRequest("Invalid token".to_string()))?;

    let user = get_user_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;
    update_password(&state.db, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "password reset");

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}
