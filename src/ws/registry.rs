//! Live connection registry with broadcast fan-out.
//!
//! [`ConnectionRegistry`] is the only shared mutable state in the hub.
//! Each registered connection is represented by the bounded mpsc sender
//! feeding its writer task; the registry never touches sockets directly.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::RwLock;
use tokio::sync::mpsc;

use super::frames::ServerFrame;

/// Per-session identifier of one live connection.
///
/// Minted at connection establishment, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Mints a new random id (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound channel half of one registered connection.
pub type FrameSender = mpsc::Sender<String>;

/// Tracks every open connection and provides the broadcast primitive.
///
/// # Concurrency
///
/// Registration, deregistration, and broadcast run concurrently from
/// independent connection tasks; membership mutations are serialized by
/// the outer `RwLock` while deliveries only hold the read lock.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, FrameSender>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. Always succeeds while the hub is running.
    pub async fn register(&self, id: ConnectionId, sender: FrameSender) {
        self.connections.write().await.insert(id, sender);
    }

    /// Removes a connection. Removing an unknown id is a no-op.
    pub async fn unregister(&self, id: ConnectionId) {
        self.connections.write().await.remove(&id);
    }

    /// Delivers a frame to every registered connection.
    ///
    /// The frame is serialized once. A connection whose send buffer is
    /// full or whose receiver is gone does not abort delivery to the
    /// others; it is removed from the registry after the delivery pass.
    /// Returns the number of connections the frame was queued for.
    pub async fn broadcast(&self, frame: &ServerFrame) -> usize {
        let Ok(json) = serde_json::to_string(frame) else {
            tracing::error!("failed to serialize outbound frame");
            return 0;
        };

        let mut delivered = 0;
        let mut stale = Vec::new();
        {
            let connections = self.connections.read().await;
            for (id, sender) in connections.iter() {
                if sender.try_send(json.clone()).is_ok() {
                    delivered += 1;
                } else {
                    stale.push(*id);
                }
            }
        }
        self.remove_stale(&stale).await;
        delivered
    }

    /// Delivers a frame to one specific connection.
    ///
    /// Unknown ids are a no-op; a failed send marks the connection stale
    /// and removes it.
    pub async fn unicast(&self, id: ConnectionId, frame: &ServerFrame) {
        let Ok(json) = serde_json::to_string(frame) else {
            tracing::error!("failed to serialize outbound frame");
            return;
        };

        let failed = {
            let connections = self.connections.read().await;
            match connections.get(&id) {
                Some(sender) => sender.try_send(json).is_err(),
                None => false,
            }
        };
        if failed {
            self.remove_stale(&[id]).await;
        }
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` when no connections are registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    async fn remove_stale(&self, ids: &[ConnectionId]) {
        if ids.is_empty() {
            return;
        }
        let mut connections = self.connections.write().await;
        for id in ids {
            connections.remove(id);
            tracing::debug!(connection = %id, "removed stale connection");
        }
    }
}
