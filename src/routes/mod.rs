//! HTTP route table.

mod router;

pub use router::router;
