//! The hub: registry of live authenticated connections and event fan-out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::auth::tokens::Claims;

/// One admitted connection: its verified identity, the channel frames are
/// pushed through, and when it connected.
#[derive(Debug)]
struct ConnectionHandle {
    claims: Claims,
    tx: UnboundedSender<String>,
    connected_at: DateTime<Utc>,
}

/// Registry of live connections with publish/subscribe fan-out.
///
/// The connection map is the only shared mutable state in the server. It is
/// guarded by a mutex that is never held across an await; `publish` snapshots
/// the members under the lock and delivers outside it, so registrations and
/// removals during a fan-out never race the iteration.
#[derive(Clone, Default)]
pub struct Hub {
    connections: Arc<Mutex<HashMap<Uuid, ConnectionHandle>>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an authenticated connection and return its id.
    pub fn register(&self, claims: Claims, tx: UnboundedSender<String>) -> Uuid {
        let id = Uuid::new_v4();
        let mut connections = self.connections.lock().expect("hub lock poisoned");
        connections.insert(
            id,
            ConnectionHandle {
                claims,
                tx,
                connected_at: Utc::now(),
            },
        );
        tracing::info!(connection_id = %id, total = connections.len(), "connection registered");
        id
    }

    /// Remove a connection. Idempotent; called on every transport close.
    pub fn unregister(&self, id: Uuid) {
        let mut connections = self.connections.lock().expect("hub lock poisoned");
        if let Some(handle) = connections.remove(&id) {
            let connected_for = Utc::now() - handle.connected_at;
            tracing::info!(
                connection_id = %id,
                user_id = handle.claims.sub,
                connected_secs = connected_for.num_seconds(),
                total = connections.len(),
                "connection unregistered"
            );
        }
    }

    /// Deliver `payload` under `event` to every connection currently in the
    /// active set. Best-effort per connection: a peer whose channel is gone
    /// is skipped without affecting the others or the caller. Returns the
    /// number of connections the frame was handed to.
    pub fn publish(&self, event: &str, payload: Value) -> usize {
        let frame = json!({ "event": event, "data": payload }).to_string();

        let targets: Vec<UnboundedSender<String>> = {
            let connections = self.connections.lock().expect("hub lock poisoned");
            connections.values().map(|handle| handle.tx.clone()).collect()
        };

        let mut delivered = 0;
        for tx in targets {
            if tx.send(frame.clone()).is_ok() {
                delivered += 1;
            }
        }

        tracing::debug!(event, delivered, "event published");
        delivered
    }

    /// Number of currently registered connections.
    pub fn len(&self) -> usize {
        self.connections.lock().expect("hub lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tokens::Role;
    use chrono::Duration;
    use tokio::sync::mpsc;

    fn test_claims(sub: i64) -> Claims {
        Claims::new(
            sub,
            Role::User,
            Some(format!("user-{sub}")),
            "#ff0000".to_string(),
            Duration::hours(1),
        )
    }

    #[tokio::test]
    async fn test_publish_reaches_all_registered_connections() {
        let hub = Hub::new();
        let mut receivers = Vec::new();
        for i in 0..3 {
            let (tx, rx) = mpsc::unbounded_channel();
            hub.register(test_claims(i), tx);
            receivers.push(rx);
        }

        let delivered = hub.publish("new_message", json!({"content": "hi"}));
        assert_eq!(delivered, 3);

        for rx in &mut receivers {
            let frame = rx.recv().await.unwrap();
            let value: Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(value["event"], "new_message");
            assert_eq!(value["data"]["content"], "hi");
        }
    }

    #[tokio::test]
    async fn test_publish_with_no_connections_is_a_noop() {
        let hub = Hub::new();
        assert_eq!(hub.publish("new_message", json!({})), 0);
    }

    #[tokio::test]
    async fn test_unregistered_connection_stops_receiving() {
        let hub = Hub::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let id_a = hub.register(test_claims(1), tx_a);
        hub.register(test_claims(2), tx_b);

        hub.unregister(id_a);
        let delivered = hub.publish("new_message", json!({"n": 1}));

        assert_eq!(delivered, 1);
        assert!(rx_b.recv().await.is_some());
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let hub = Hub::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(test_claims(1), tx);

        hub.unregister(id);
        hub.unregister(id);
        assert!(hub.is_empty());
    }

    #[tokio::test]
    async fn test_dead_receiver_does_not_abort_fanout() {
        let hub = Hub::new();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        hub.register(test_claims(1), tx_dead);
        hub.register(test_claims(2), tx_live);

        // Peer went away without unregistering yet.
        drop(rx_dead);

        let delivered = hub.publish("new_message", json!({"content": "still here"}));
        assert_eq!(delivered, 1);
        assert!(rx_live.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_register_and_publish() {
        let hub = Hub::new();
        let mut tasks = Vec::new();
        for i in 0..16 {
            let hub = hub.clone();
            tasks.push(tokio::spawn(async move {
                let (tx, mut rx) = mpsc::unbounded_channel();
                let id = hub.register(test_claims(i), tx);
                hub.publish("tick", json!({ "from": i }));
                // Drain whatever arrived while registered.
                while rx.try_recv().is_ok() {}
                hub.unregister(id);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert!(hub.is_empty());
    }
}
