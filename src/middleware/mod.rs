//! HTTP middleware.

pub mod auth;

pub use auth::{auth_middleware, is_public_route, AuthUser};
