//! Application state and startup wiring.

pub mod init;
pub mod state;

pub use init::{build_router, create_app};
pub use state::AppState;
