//! HTTP handlers for the auth routes.

pub mod facebook;
pub mod forgot_password;
pub mod login;
pub mod me;
pub mod register;
pub mod reset_password;
pub mod types;

pub use facebook::facebook_login;
pub use forgot_password::forgot_password;
pub use login::login;
pub use me::me;
pub use register::register;
pub use reset_password::reset_password;
