//! Authentication: identity tokens, user records and the auth HTTP handlers.

pub mod handlers;
pub mod tokens;
pub mod users;

pub use handlers::{facebook_login, forgot_password, login, me, register, reset_password};
pub use tokens::{issue, session_ttl, verify, Claims, Role};
