//! Wire protocol frames.
//!
//! One JSON object per WebSocket text message, discriminated by a `type`
//! field. The inbound surface is exactly three request kinds; outbound
//! adds an `error` frame so validation and store failures are no longer
//! silent for the requesting client.

use serde::{Deserialize, Serialize};

use crate::domain::{Comment, CommentId, PlaylistId, UserId};
use crate::error::HubError;

/// Client → hub request frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    /// Request the full comment history of a playlist.
    #[serde(rename = "getComments", rename_all = "camelCase")]
    GetComments {
        /// Playlist to fetch history for.
        playlist_id: PlaylistId,
    },
    /// Add a comment to a playlist's thread.
    #[serde(rename = "addComment", rename_all = "camelCase")]
    AddComment {
        /// Comment body.
        text: String,
        /// Author identity, supplied (and trusted) externally.
        author: UserId,
        /// Target playlist.
        playlist_id: PlaylistId,
    },
    /// Delete a comment by id.
    #[serde(rename = "deleteComment", rename_all = "camelCase")]
    DeleteComment {
        /// Comment to delete.
        comment_id: CommentId,
    },
}

/// Hub → client frame.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    /// Unicast reply to `getComments`: ordered oldest→newest.
    #[serde(rename = "history", rename_all = "camelCase")]
    History {
        /// Playlist the history belongs to.
        playlist_id: PlaylistId,
        /// Comments ascending by creation time.
        data: Vec<Comment>,
    },
    /// Broadcast to all connections after a successful add.
    #[serde(rename = "commentAdded", rename_all = "camelCase")]
    CommentAdded {
        /// Playlist tag for client-side filtering.
        playlist_id: PlaylistId,
        /// The persisted comment, author resolved.
        data: Comment,
    },
    /// Broadcast to all connections after a successful delete.
    #[serde(rename = "commentDeleted", rename_all = "camelCase")]
    CommentDeleted {
        /// Playlist tag for client-side filtering.
        playlist_id: PlaylistId,
        /// Id of the removed comment.
        comment_id: CommentId,
    },
    /// Unicast failure report for the requesting connection.
    #[serde(rename = "error", rename_all = "camelCase")]
    Error {
        /// Numeric error code (see [`HubError::error_code`]).
        code: u32,
        /// Human-readable message.
        message: String,
    },
}

impl ServerFrame {
    /// Builds an error frame from a [`HubError`].
    #[must_use]
    pub fn error(err: &HubError) -> Self {
        Self::Error {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}
