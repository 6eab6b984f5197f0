//! Clients for third-party services.

pub mod facebook;

pub use facebook::{FacebookClient, FacebookUser};
