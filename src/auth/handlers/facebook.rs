//! POST /auth/facebook — exchange a Facebook access token for an identity
//! token, creating the account on first login.

use axum::{extract::State, response::Json};

use crate::auth::handlers::types::{FacebookLoginRequest, TokenResponse};
use crate::auth::tokens::{issue, session_ttl, Claims};
use crate::auth::users::{create_user, get_user_by_facebook_id, NewUser};
use crate::constants::random_color;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Validate the access token against the Graph API, find or create the local
/// account keyed by the Facebook profile id, and issue a one-hour token.
pub async fn facebook_login(
    State(state): State<AppState>,
    Json(request): Json<FacebookLoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if request.access_token.is_empty() {
        return Err(ApiError::validation(
            "accessToken",
            "Access token is required",
        ));
    }

    let profile = state
        .facebook
        .fetch_user(&request.access_token)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid access token".to_string()))?;

    let user = match get_user_by_facebook_id(&state.db, &profile.id).await? {
        Some(user) => user,
        None => {
            let user = create_user(
                &state.db,
                NewUser {
                    email: profile.email.unwrap_or_default(),
                    name: Some(profile.name),
                    color: random_color(),
                    password_hash: None,
                    facebook_id: Some(profile.id),
                },
            )
            .await?;
            tracing::info!(user_id = user.id, "account created via facebook login");
            user
        }
    };

    let claims = Claims::for_user(&user, session_ttl(false));
    let token = issue(&claims, state.config.secret_key.as_bytes())?;

    Ok(Json(TokenResponse { token }))
}
