//! Inbound frame dispatch.
//!
//! Stateless between frames: each call interprets exactly one inbound
//! text frame from one connection and produces zero or more outbound
//! frames through the registry. Failures never propagate to the caller;
//! they are logged and, for validation and store errors, reported back
//! to the requesting connection as an `error` frame.

use crate::app_state::AppState;
use crate::error::HubError;

use super::frames::{ClientFrame, ServerFrame};
use super::registry::ConnectionId;

/// Handles one inbound text frame from `conn_id`.
///
/// Unparseable or unrecognized frames are dropped with a logged warning;
/// the connection stays open.
pub async fn handle_frame(text: &str, conn_id: ConnectionId, state: &AppState) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::warn!(connection = %conn_id, error = %err, "dropping malformed frame");
            return;
        }
    };

    match frame {
        ClientFrame::GetComments { playlist_id } => {
            match state.store.find_by_playlist(&playlist_id).await {
                Ok(comments) => {
                    let history = ServerFrame::History {
                        playlist_id,
                        data: comments,
                    };
                    state.registry.unicast(conn_id, &history).await;
                }
                Err(err) => report_failure(conn_id, state, &err, "history fetch failed").await,
            }
        }

        ClientFrame::AddComment {
            text,
            author,
            playlist_id,
        } => match state.store.create(&text, &author, &playlist_id).await {
            Ok(comment) => {
                let added = ServerFrame::CommentAdded {
                    playlist_id,
                    data: comment,
                };
                let delivered = state.registry.broadcast(&added).await;
                tracing::debug!(connection = %conn_id, delivered, "comment added");
            }
            Err(err) => report_failure(conn_id, state, &err, "add comment failed").await,
        },

        ClientFrame::DeleteComment { comment_id } => {
            match state.store.delete_by_id(&comment_id).await {
                Ok(Some(deleted)) => {
                    let frame = ServerFrame::CommentDeleted {
                        playlist_id: deleted.playlist_id,
                        comment_id,
                    };
                    let delivered = state.registry.broadcast(&frame).await;
                    tracing::debug!(connection = %conn_id, delivered, "comment deleted");
                }
                // Unknown id: no broadcast, silent no-op per protocol.
                Ok(None) => {
                    tracing::debug!(connection = %conn_id, comment = %comment_id, "delete of unknown comment ignored");
                }
                Err(err) => report_failure(conn_id, state, &err, "delete comment failed").await,
            }
        }
    }
}

async fn report_failure(conn_id: ConnectionId, state: &AppState, err: &HubError, context: &str) {
    tracing::error!(connection = %conn_id, error = %err, "{context}");
    state
        .registry
        .unicast(conn_id, &ServerFrame::error(err))
        .await;
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::{PlaylistId, UserId};
    use crate::store::MemCommentStore;
    use crate::ws::registry::FrameSender;

    async fn state_with_store(store: MemCommentStore) -> AppState {
        AppState::new(Arc::new(store), 64)
    }

    async fn attach(state: &AppState) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let (tx, rx): (FrameSender, _) = mpsc::channel(64);
        state.registry.register(id, tx).await;
        (id, rx)
    }

    fn next_json(rx: &mut mpsc::Receiver<String>) -> serde_json::Value {
        let Ok(raw) = rx.try_recv() else {
            panic!("expected an outbound frame");
        };
        let Ok(json) = serde_json::from_str(&raw) else {
            panic!("outbound frame is not valid JSON");
        };
        json
    }

    #[tokio::test]
    async fn add_comment_broadcasts_to_everyone() {
        let store = MemCommentStore::new();
        store.insert_user(UserId::from("u1"), "u1name", None).await;
        let state = state_with_store(store).await;
        let (sender, mut sender_rx) = attach(&state).await;
        let (_other, mut other_rx) = attach(&state).await;

        handle_frame(
            r#"{"type":"addComment","text":"nice mix","author":"u1","playlistId":"p1"}"#,
            sender,
            &state,
        )
        .await;

        for rx in [&mut sender_rx, &mut other_rx] {
            let json = next_json(rx);
            assert_eq!(json["type"], "commentAdded");
            assert_eq!(json["playlistId"], "p1");
            assert_eq!(json["data"]["text"], "nice mix");
            assert_eq!(json["data"]["author"]["username"], "u1name");
            assert!(json["data"]["id"].is_string());
            assert!(json["data"]["createdAt"].is_string());
        }
    }

    #[tokio::test]
    async fn invalid_text_sends_error_only_to_sender() {
        let state = state_with_store(MemCommentStore::new()).await;
        let (sender, mut sender_rx) = attach(&state).await;
        let (_other, mut other_rx) = attach(&state).await;

        handle_frame(
            r#"{"type":"addComment","text":"   ","author":"u1","playlistId":"p1"}"#,
            sender,
            &state,
        )
        .await;

        let json = next_json(&mut sender_rx);
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], 1001);
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_history_returns_empty_list() {
        let state = state_with_store(MemCommentStore::new()).await;
        let (sender, mut sender_rx) = attach(&state).await;
        let (_other, mut other_rx) = attach(&state).await;

        handle_frame(
            r#"{"type":"getComments","playlistId":"p1"}"#,
            sender,
            &state,
        )
        .await;

        let json = next_json(&mut sender_rx);
        assert_eq!(json["type"], "history");
        assert_eq!(json["playlistId"], "p1");
        assert_eq!(json["data"], serde_json::json!([]));
        // History is unicast: the other connection sees nothing.
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn history_reflects_prior_adds_in_order() {
        let state = state_with_store(MemCommentStore::new()).await;
        let (sender, mut sender_rx) = attach(&state).await;

        for text in ["first", "second"] {
            handle_frame(
                &format!(r#"{{"type":"addComment","text":"{text}","author":"u1","playlistId":"p1"}}"#),
                sender,
                &state,
            )
            .await;
            // Drain the resulting broadcast.
            let _ = sender_rx.try_recv();
        }

        handle_frame(
            r#"{"type":"getComments","playlistId":"p1"}"#,
            sender,
            &state,
        )
        .await;

        let json = next_json(&mut sender_rx);
        assert_eq!(json["data"][0]["text"], "first");
        assert_eq!(json["data"][1]["text"], "second");
    }

    #[tokio::test]
    async fn delete_existing_broadcasts_with_playlist_tag() {
        let store = MemCommentStore::new();
        let state = state_with_store(store).await;
        let (sender, mut sender_rx) = attach(&state).await;

        handle_frame(
            r#"{"type":"addComment","text":"bye","author":"u1","playlistId":"p7"}"#,
            sender,
            &state,
        )
        .await;
        let added = next_json(&mut sender_rx);
        let Some(comment_id) = added["data"]["id"].as_str() else {
            panic!("missing comment id");
        };

        handle_frame(
            &format!(r#"{{"type":"deleteComment","commentId":"{comment_id}"}}"#),
            sender,
            &state,
        )
        .await;

        let json = next_json(&mut sender_rx);
        assert_eq!(json["type"], "commentDeleted");
        assert_eq!(json["playlistId"], "p7");
        assert_eq!(json["commentId"], comment_id);
    }

    #[tokio::test]
    async fn delete_unknown_produces_no_frames() {
        let state = state_with_store(MemCommentStore::new()).await;
        let (sender, mut sender_rx) = attach(&state).await;

        handle_frame(
            r#"{"type":"deleteComment","commentId":"ghost"}"#,
            sender,
            &state,
        )
        .await;

        assert!(sender_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_frame_is_dropped_without_output() {
        let state = state_with_store(MemCommentStore::new()).await;
        let (sender, mut sender_rx) = attach(&state).await;
        let (other, mut other_rx) = attach(&state).await;

        handle_frame("not json at all", sender, &state).await;
        handle_frame(r#"{"type":"unknownKind"}"#, sender, &state).await;
        assert!(sender_rx.try_recv().is_err());

        // The other connection is unaffected and can still operate.
        handle_frame(
            r#"{"type":"getComments","playlistId":"p1"}"#,
            other,
            &state,
        )
        .await;
        let json = next_json(&mut other_rx);
        assert_eq!(json["type"], "history");
    }

    #[tokio::test]
    async fn history_is_scoped_to_requested_playlist() {
        let state = state_with_store(MemCommentStore::new()).await;
        let (sender, mut sender_rx) = attach(&state).await;

        handle_frame(
            r#"{"type":"addComment","text":"on p1","author":"u1","playlistId":"p1"}"#,
            sender,
            &state,
        )
        .await;
        let _ = sender_rx.try_recv();
        handle_frame(
            r#"{"type":"addComment","text":"on p2","author":"u1","playlistId":"p2"}"#,
            sender,
            &state,
        )
        .await;
        let _ = sender_rx.try_recv();

        handle_frame(
            r#"{"type":"getComments","playlistId":"p2"}"#,
            sender,
            &state,
        )
        .await;
        let json = next_json(&mut sender_rx);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["data"][0]["text"], "on p2");
        assert_eq!(json["playlistId"], "p2");
    }
}
