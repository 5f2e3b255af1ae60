//! comment-hub server entry point.
//!
//! Starts the Axum server with the WebSocket comment endpoint and the
//! system routes, backed by PostgreSQL when `DATABASE_URL` is set and by
//! the in-memory store otherwise.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use comment_hub::app_state::AppState;
use comment_hub::build_app;
use comment_hub::config::HubConfig;
use comment_hub::store::{CommentStore, MemCommentStore, PostgresCommentStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = HubConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting comment-hub");

    // Select the comment store backend
    let store: Arc<dyn CommentStore> = match &config.database_url {
        Some(url) => {
            let store = PostgresCommentStore::connect(
                url,
                config.database_max_connections,
                config.database_connect_timeout_secs,
            )
            .await?;
            tracing::info!("comment store: postgres");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; comments are held in memory only");
            Arc::new(MemCommentStore::new())
        }
    };

    // Build application state and router
    let state = AppState::new(store, config.send_buffer_capacity);
    let app = build_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
