//! POST /auth/forgot-password — email a time-limited reset link.

use axum::{extract::State, response::Json};

use crate::auth::handlers::types::{ForgotPasswordRequest, MessageResponse};
use crate::auth::tokens::{issue, reset_ttl, Claims};
use crate::auth::users::get_user_by_email;
use crate::error::{ApiError, FieldError};
use crate::server::state::AppState;
use crate::validate::{is_valid_email, is_valid_url};

fn validate(request: &ForgotPasswordRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if request.email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&request.email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }
    if request.redirect_url.is_empty() {
        errors.push(FieldError::new("redirectUrl", "Redirect URL is required"));
    } else if !is_valid_url(&request.redirect_url) {
        errors.push(FieldError::new("redirectUrl", "Invalid URL format"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Issue a one-hour reset token for the account and mail a link carrying it.
/// The token is appended to the caller-supplied redirect URL as `?token=`.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate(&request)?;

    let user = get_user_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let claims = Claims::for_user(&user, reset_ttl());
    let token = issue(&claims, state.config.secret_key.as_bytes())?;
    let reset_url = format!("{}?token={}", request.redirect_url, token);

    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| ApiError::Email("mail transport not configured".to_string()))?;

    mailer
        .send(
            &user.email,
            "Reset Password",
            &format!(
                "<p>Click the link below to reset your password</p>\
                 <a href=\"{reset_url}\">{reset_url}</a>"
            ),
        )
        .await?;

    tracing::info!(user_id = user.id, "password reset email sent");

    Ok(Json(MessageResponse {
        message: "Email sent successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_both_fields() {
        let request = ForgotPasswordRequest {
            email: String::new(),
            redirect_url: String::new(),
        };
        match validate(&request) {
            Err(ApiError::Validation(fields)) => {
                let paths: Vec<_> = fields.iter().map(|f| f.path.as_str()).collect();
                assert_eq!(paths, vec!["email", "redirectUrl"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_non_http_redirect() {
        let request = ForgotPasswordRequest {
            email: "a@x.com".to_string(),
            redirect_url: "javascript:alert(1)".to_string(),
        };
        match validate(&request) {
            Err(ApiError::Validation(fields)) => {
                assert_eq!(fields[0].path, "redirectUrl");
                assert_eq!(fields[0].message, "Invalid URL format");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
