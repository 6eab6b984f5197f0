//! POST /auth/login — authenticate with email and password.

use axum::{extract::State, response::Json};

use crate::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::auth::tokens::{issue, session_ttl, Claims};
use crate::auth::users::get_user_by_email;
use crate::error::{ApiError, FieldError};
use crate::server::state::AppState;
use crate::validate::is_valid_email;

fn validate(request: &LoginRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if request.email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&request.email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }
    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Verify credentials and return a signed identity token.
///
/// Unknown email and wrong password produce the same response so callers
/// cannot probe which addresses are registered.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate(&request)?;

    let user = get_user_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    // Social-login accounts have no password hash; they cannot use this route.
    let hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    if !bcrypt::verify(&request.password, hash)? {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let claims = Claims::for_user(&user, session_ttl(request.remember_me));
    let token = issue(&claims, state.config.secret_key.as_bytes())?;

    tracing::info!(user_id = user.id, remember_me = request.remember_me, "login");

    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_flags_missing_fields() {
        let request = LoginRequest {
            email: String::new(),
            password: String::new(),
            remember_me: false,
        };
        match validate(&request) {
            Err(ApiError::Validation(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].path, "email");
                assert_eq!(fields[1].path, "password");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_flags_bad_email_format() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            remember_me: false,
        };
        match validate(&request) {
            Err(ApiError::Validation(fields)) => {
                assert_eq!(fields[0].message, "Invalid email format");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_input() {
        let request = LoginRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            remember_me: true,
        };
        assert!(validate(&request).is_ok());
    }
}
