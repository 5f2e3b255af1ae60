//! Comment persistence: the [`CommentStore`] collaborator contract and its
//! implementations.
//!
//! The hub never reaches into a database directly; everything goes through
//! the object-safe [`CommentStore`] trait so the WebSocket layer can be
//! exercised against [`MemCommentStore`] in tests and run against
//! [`PostgresCommentStore`] in production.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, PlaylistId, UserId};
use crate::error::HubError;

pub use memory::MemCommentStore;
pub use postgres::PostgresCommentStore;

/// Durable CRUD over comment records, keyed by playlist and author identity.
///
/// Implementations provide their own internal concurrency safety; the hub
/// calls these methods concurrently from independent connection tasks.
#[async_trait]
pub trait CommentStore: fmt::Debug + Send + Sync {
    /// Returns all comments of a playlist, ascending by creation time,
    /// each with its author summary resolved.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreError`] on persistence failure.
    async fn find_by_playlist(&self, playlist_id: &PlaylistId) -> Result<Vec<Comment>, HubError>;

    /// Persists a new comment and returns it with the store-assigned id,
    /// creation timestamp, and resolved author summary.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidComment`] when the text fails validation
    /// and [`HubError::StoreError`] on persistence failure.
    async fn create(
        &self,
        text: &str,
        author: &UserId,
        playlist_id: &PlaylistId,
    ) -> Result<Comment, HubError>;

    /// Deletes a comment by id, returning the deleted record or `None`
    /// when no such comment exists.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreError`] on persistence failure.
    async fn delete_by_id(&self, comment_id: &CommentId) -> Result<Option<Comment>, HubError>;
}
