//! Connection gate: handshake authentication for realtime connections.
//!
//! Each connection attempt moves `PENDING -> AUTHENTICATED | REJECTED` based
//! solely on its first frame. The token travels in the handshake payload
//! because the transport is not plain HTTP; cookies are not consulted.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::auth::tokens::{verify, Claims};

/// Message sent to the client on any handshake failure. Deliberately
/// uniform: missing, malformed and expired tokens are indistinguishable to
/// the peer.
pub const AUTH_ERROR_MESSAGE: &str = "Authentication error";

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("handshake frame is not valid JSON")]
    MalformedFrame,
    #[error("handshake carried no token")]
    MissingToken,
    #[error("token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Deserialize)]
struct HandshakeFrame {
    #[serde(default)]
    token: Option<String>,
}

/// Authenticate a connection's handshake frame.
///
/// Returns the verified claims to attach to the connection, or the reason it
/// must be rejected. There is no retry; a rejected client reconnects with a
/// fresh handshake.
pub fn authenticate_handshake(frame: &str, secret: &[u8]) -> Result<Claims, HandshakeError> {
    let handshake: HandshakeFrame =
        serde_json::from_str(frame).map_err(|_| HandshakeError::MalformedFrame)?;
    let token = handshake.token.ok_or(HandshakeError::MissingToken)?;
    Ok(verify(&token, secret)?)
}

/// The frame emitted to a rejected connection before closing it.
pub fn rejection_frame() -> String {
    json!({
        "event": "error",
        "data": { "message": AUTH_ERROR_MESSAGE },
    })
    .to_string()
}
