//! PostgreSQL implementation of the comment store.
//!
//! Comments live in a `comments` table with opaque TEXT ids; author
//! summaries are resolved with a `LEFT JOIN` against the `users` table
//! owned by the surrounding user service. Schema migrations are embedded
//! and run once at startup.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use async_trait::async_trait;

use super::CommentStore;
use crate::domain::{AuthorSummary, Comment, CommentId, PlaylistId, UserId, validated_text};
use crate::error::HubError;

/// PostgreSQL-backed [`CommentStore`] using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresCommentStore {
    pool: PgPool,
}

impl PostgresCommentStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreError`] when the connection or a migration
    /// fails.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Result<Self, HubError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| HubError::StoreError(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| HubError::StoreError(e.to_string()))?;

        Ok(Self::new(pool))
    }

    async fn author_summary(&self, author: &UserId) -> Result<AuthorSummary, HubError> {
        let row = sqlx::query_as::<_, (String, Option<String>)>(
            "SELECT username, avatar FROM users WHERE id = $1",
        )
        .bind(author.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HubError::StoreError(e.to_string()))?;

        let (username, avatar) = row.unwrap_or((author.to_string(), None));
        Ok(AuthorSummary {
            id: author.clone(),
            username,
            avatar,
        })
    }
}

#[async_trait]
impl CommentStore for PostgresCommentStore {
    async fn find_by_playlist(&self, playlist_id: &PlaylistId) -> Result<Vec<Comment>, HubError> {
        type Row = (
            String,
            String,
            String,
            String,
            DateTime<Utc>,
            Option<String>,
            Option<String>,
        );
        let rows = sqlx::query_as::<_, Row>(
            "SELECT c.id, c.text, c.author_id, c.playlist_id, c.created_at, \
                    u.username, u.avatar \
             FROM comments c LEFT JOIN users u ON u.id = c.author_id \
             WHERE c.playlist_id = $1 \
             ORDER BY c.created_at ASC",
        )
        .bind(playlist_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HubError::StoreError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, text, author_id, playlist_id, created_at, username, avatar)| Comment {
                    id: CommentId::from(id),
                    text,
                    author: AuthorSummary {
                        username: username.unwrap_or_else(|| author_id.clone()),
                        id: UserId::from(author_id),
                        avatar,
                    },
                    playlist_id: PlaylistId::from(playlist_id),
                    created_at,
                },
            )
            .collect())
    }

    async fn create(
        &self,
        text: &str,
        author: &UserId,
        playlist_id: &PlaylistId,
    ) -> Result<Comment, HubError> {
        let text = validated_text(text)?;
        let id = CommentId::generate();

        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO comments (id, text, author_id, playlist_id) \
             VALUES ($1, $2, $3, $4) RETURNING created_at",
        )
        .bind(id.as_str())
        .bind(text)
        .bind(author.as_str())
        .bind(playlist_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| HubError::StoreError(e.to_string()))?;

        Ok(Comment {
            id,
            text: text.to_string(),
            author: self.author_summary(author).await?,
            playlist_id: playlist_id.clone(),
            created_at,
        })
    }

    async fn delete_by_id(&self, comment_id: &CommentId) -> Result<Option<Comment>, HubError> {
        let row = sqlx::query_as::<_, (String, String, String, DateTime<Utc>)>(
            "DELETE FROM comments WHERE id = $1 \
             RETURNING text, author_id, playlist_id, created_at",
        )
        .bind(comment_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HubError::StoreError(e.to_string()))?;

        let Some((text, author_id, playlist_id, created_at)) = row else {
            return Ok(None);
        };

        let author = self.author_summary(&UserId::from(author_id)).await?;
        Ok(Some(Comment {
            id: comment_id.clone(),
            text,
            author,
            playlist_id: PlaylistId::from(playlist_id),
            created_at,
        }))
    }
}
