//! POST /auth/register — create a local-credential account.

use axum::{extract::State, http::StatusCode, response::Json};

use crate::auth::handlers::types::{RegisterRequest, RegisterResponse, RegisteredUser};
use crate::auth::users::{create_user, get_user_by_email, NewUser};
use crate::constants::random_color;
use crate::error::{ApiError, FieldError};
use crate::server::state::AppState;
use crate::validate::is_valid_email;

fn validate(request: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if !is_valid_email(&request.email) {
        errors.push(FieldError::new("email", "Invalid email format"));
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

/// Register a new user with a bcrypt-hashed password and a random display
/// color. Answers 201 with the public fields of the created account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    validate(&request)?;

    if get_user_by_email(&state.db, &request.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;

    let user = create_user(
        &state.db,
        NewUser {
            email: request.email,
            name: request.name,
            color: random_color(),
            password_hash: Some(password_hash),
            facebook_id: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: RegisteredUser {
                id: user.id,
                email: user.email,
                name: user.name,
            },
        }),
    ))
}
