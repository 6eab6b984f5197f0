//! Chatline - token-authenticated chat backend.
//!
//! An Axum HTTP server with a WebSocket broadcast channel on top of
//! Postgres. Clients authenticate with a JWT carried in the `_authToken`
//! cookie for HTTP requests and in the first WebSocket frame for the
//! realtime connection.
//!
//! # Module Structure
//!
//! - **`auth`** - identity tokens, user records and the auth HTTP handlers
//! - **`messages`** - persisted chat messages, ingress and listing
//! - **`realtime`** - WebSocket hub, handshake gate and connection loop
//! - **`middleware`** - cookie-based request gate for protected routes
//! - **`routes`** / **`server`** - route table, shared state and startup
//! - **`services`** - Facebook Graph client for token-based login
//! - **`email`** - SMTP mailer for password-reset mail

pub mod auth;
pub mod config;
pub mod constants;
pub mod email;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod realtime;
pub mod routes;
pub mod server;
pub mod services;
pub mod validate;
