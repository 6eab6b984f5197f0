//! Identity token codec.
//!
//! Tokens are HS256 JWTs carrying the user's id, role, display name and
//! display color. A token is valid only while its signature verifies against
//! the configured secret and its expiry has not elapsed; there is no
//! server-side revocation. Session tokens live for one hour, or seven days
//! when the caller sets the remember-me flag. Password-reset links reuse the
//! same codec with a one-hour expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::users::User;

/// Account role embedded in tokens and stored on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse the role column; unknown values fall back to `User`.
    pub fn from_db(value: &str) -> Role {
        match value {
            "ADMIN" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// JWT claims for an authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// Account role.
    pub role: Role,
    /// Display name, if the account has one.
    #[serde(default)]
    pub name: Option<String>,
    /// Display color (hex string).
    pub color: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiry (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Build claims expiring `ttl` from now.
    pub fn new(sub: i64, role: Role, name: Option<String>, color: String, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            role,
            name,
            color,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Claims for a stored user record.
    pub fn for_user(user: &User, ttl: Duration) -> Self {
        Self::new(
            user.id,
            Role::from_db(&user.role),
            user.name.clone(),
            user.color.clone(),
            ttl,
        )
    }
}

/// Time-to-live for a login session token.
pub fn session_ttl(remember_me: bool) -> Duration {
    if remember_me {
        Duration::days(7)
    } else {
        Duration::hours(1)
    }
}

/// Time-to-live for a password-reset token.
pub fn reset_ttl() -> Duration {
    Duration::hours(1)
}

/// Sign claims into a compact token string.
pub fn issue(claims: &Claims, secret: &[u8]) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret),
    )
}

/// Verify the signature and expiry of a token and return its claims.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
