//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::store::CommentStore;
use crate::ws::registry::ConnectionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Comment persistence collaborator.
    pub store: Arc<dyn CommentStore>,
    /// Live connection set and broadcast primitive.
    pub registry: Arc<ConnectionRegistry>,
    /// Capacity of each connection's outbound send buffer.
    pub send_buffer_capacity: usize,
}

impl AppState {
    /// Builds the state over a store implementation.
    #[must_use]
    pub fn new(store: Arc<dyn CommentStore>, send_buffer_capacity: usize) -> Self {
        Self {
            store,
            registry: Arc::new(ConnectionRegistry::new()),
            send_buffer_capacity,
        }
    }
}
