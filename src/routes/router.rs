use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::Method;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::messages;
use crate::middleware::auth_middleware;
use crate::realtime;
use crate::server::AppState;

/// Build the full route table with the request gate, CORS and request
/// tracing applied.
pub fn router(state: AppState) -> Router {
    // Credentials rule out a wildcard origin, so the requesting origin is
    // mirrored back instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, COOKIE]);

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/auth/facebook", post(auth::facebook_login))
        .route("/auth/user", get(auth::me))
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route("/ws", get(realtime::ws_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
