//! WebSocket layer: protocol frames, connection registry, per-connection
//! lifecycle and frame routing.
//!
//! The endpoint at `/ws` carries the whole comment protocol. Broadcast is
//! global: every frame is tagged with a playlist id and clients filter on
//! their side, so switching playlists needs no server-side state change.

pub mod connection;
pub mod frames;
pub mod handler;
pub mod registry;
pub mod router;
