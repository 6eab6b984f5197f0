//! Realtime layer: authenticated WebSocket connections and event fan-out.
//!
//! # Wire protocol
//!
//! All frames are JSON text. The client's first frame is the handshake:
//!
//! ```json
//! {"token": "<identity token>"}
//! ```
//!
//! A failed handshake receives
//! `{"event":"error","data":{"message":"Authentication error"}}` followed by
//! a close; the connection is never admitted to the hub and there is no retry
//! within a connection. After a successful handshake the server pushes hub
//! events as `{"event": <name>, "data": <payload>}`, and the client may emit
//! `{"event":"chatMessage","data":<any>}` frames which are echoed to every
//! connected client.
//!
//! The hub is push-only and non-durable: connections that join after an event
//! was published do not receive it. Durability is the message store's job.

pub mod connection;
pub mod gate;
pub mod hub;

pub use connection::ws_handler;
pub use gate::authenticate_handshake;
pub use hub::Hub;
