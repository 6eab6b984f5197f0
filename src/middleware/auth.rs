//! Request gate: cookie-token authentication for every non-public route.
//!
//! The gate runs on every request. Paths on the public allow-list pass
//! through untouched, malformed cookies included. Everything else must
//! present a verifiable token in the `_authToken` cookie; the decoded claims
//! are attached to the request extensions for handlers to read via
//! [`AuthUser`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::auth::tokens::{verify, Claims};
use crate::constants::AUTH_COOKIE;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Routes that never require a token. `/api-docs` is matched as a prefix;
/// `/ws` authenticates inside its own handshake instead of here.
const PUBLIC_ROUTES: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/forgot-password",
    "/auth/reset-password",
    "/auth/facebook",
    "/ws",
];

pub fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES.contains(&path) || path == "/api-docs" || path.starts_with("/api-docs/")
}

/// Gate middleware applied to the whole router.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public_route(request.uri().path()) {
        return next.run(request).await;
    }

    let Some(cookie) = jar.get(AUTH_COOKIE) else {
        return ApiError::Auth("Unauthorized, token is required".to_string()).into_response();
    };

    match verify(cookie.value(), state.config.secret_key.as_bytes()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(error) => {
            tracing::debug!(%error, "token rejected");
            ApiError::Auth("Invalid or expired token".to_string()).into_response()
        }
    }
}

/// Extractor for the claims the gate attached to the request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::Auth("Unauthorized".to_string()))
    }
}
