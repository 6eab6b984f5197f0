//! Persisted chat messages: storage model, ingress and listing.

pub mod handlers;
pub mod model;

pub use handlers::{create_message, list_messages, submit};
pub use model::{Message, MessageSender};
