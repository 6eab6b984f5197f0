//! Error types shared by every handler and component.

pub mod conversion;
pub mod types;

pub use types::{ApiError, FieldError};
