//! In-memory comment store.
//!
//! Backs the hub when no `DATABASE_URL` is configured and serves as the
//! store double in tests. State lives behind [`tokio::sync::RwLock`]s and
//! is lost on process exit.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::CommentStore;
use crate::domain::{AuthorSummary, Comment, CommentId, PlaylistId, UserId, validated_text};
use crate::error::HubError;

/// Volatile [`CommentStore`] implementation.
///
/// Holds comments in insertion order and a user directory for author
/// resolution. Authors with no directory entry resolve to a summary whose
/// username echoes the raw user id.
#[derive(Debug, Default)]
pub struct MemCommentStore {
    comments: RwLock<Vec<Comment>>,
    users: RwLock<HashMap<UserId, AuthorSummary>>,
}

impl MemCommentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user in the directory so authored comments resolve to
    /// this display summary.
    pub async fn insert_user(&self, id: UserId, username: &str, avatar: Option<&str>) {
        let summary = AuthorSummary {
            id: id.clone(),
            username: username.to_string(),
            avatar: avatar.map(ToString::to_string),
        };
        self.users.write().await.insert(id, summary);
    }

    /// Inserts a fully-formed comment, bypassing id/timestamp assignment.
    ///
    /// Intended for seeding history with explicit creation times.
    pub async fn insert_comment(&self, comment: Comment) {
        self.comments.write().await.push(comment);
    }

    async fn resolve_author(&self, author: &UserId) -> AuthorSummary {
        let users = self.users.read().await;
        users.get(author).cloned().unwrap_or_else(|| AuthorSummary {
            id: author.clone(),
            username: author.to_string(),
            avatar: None,
        })
    }
}

#[async_trait]
impl CommentStore for MemCommentStore {
    async fn find_by_playlist(&self, playlist_id: &PlaylistId) -> Result<Vec<Comment>, HubError> {
        let comments = self.comments.read().await;
        let mut matched: Vec<Comment> = comments
            .iter()
            .filter(|c| &c.playlist_id == playlist_id)
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.created_at);
        Ok(matched)
    }

    async fn create(
        &self,
        text: &str,
        author: &UserId,
        playlist_id: &PlaylistId,
    ) -> Result<Comment, HubError> {
        let text = validated_text(text)?;
        let comment = Comment {
            id: CommentId::generate(),
            text: text.to_string(),
            author: self.resolve_author(author).await,
            playlist_id: playlist_id.clone(),
            created_at: Utc::now(),
        };
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn delete_by_id(&self, comment_id: &CommentId) -> Result<Option<Comment>, HubError> {
        let mut comments = self.comments.write().await;
        let position = comments.iter().position(|c| &c.id == comment_id);
        Ok(position.map(|idx| comments.remove(idx)))
    }
}
