//! # comment-hub
//!
//! Real-time WebSocket broadcast hub for playlist comment threads.
//!
//! Many clients hold one persistent connection each; every comment
//! mutation is persisted through the [`store::CommentStore`] collaborator
//! and fanned out to all connected clients, tagged with its playlist id
//! so clients filter for the thread they are viewing.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── WS upgrade + per-connection loop (ws/)
//!     ├── Frame router (ws/router)
//!     │
//!     ├── ConnectionRegistry (ws/registry)
//!     ├── CommentStore (store/: Postgres or in-memory)
//!     │
//!     └── Domain model (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod store;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete application router: `/ws` plus system routes.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::routes())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
