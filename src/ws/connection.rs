//! Per-connection lifecycle.
//!
//! Owns the read/write loop for a single WebSocket connection: register
//! on open, process inbound frames in arrival order, unregister on close.
//! Nothing here escapes to other connections; a failure on this socket
//! only ends this task.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::registry::ConnectionId;
use super::router::handle_frame;
use crate::app_state::AppState;

/// Runs the read/write loop for one WebSocket connection.
///
/// Inbound text frames are dispatched sequentially, so frames from this
/// client are processed FIFO. Outbound delivery goes through a bounded
/// channel drained by a writer task; the registry owns the sending half.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let conn_id = ConnectionId::new();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(state.send_buffer_capacity);

    state.registry.register(conn_id, tx).await;
    tracing::info!(connection = %conn_id, "client connected");

    let mut writer = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if ws_tx.send(Message::text(json)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(text.as_str(), conn_id, &state).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(connection = %conn_id, error = %err, "transport error");
                        break;
                    }
                    // Binary, ping and pong frames carry no protocol meaning.
                    Some(Ok(_)) => {}
                }
            }
            // Writer gone means the socket's send half is dead.
            _ = &mut writer => break,
        }
    }

    state.registry.unregister(conn_id).await;
    writer.abort();
    tracing::info!(connection = %conn_id, "client disconnected");
}
