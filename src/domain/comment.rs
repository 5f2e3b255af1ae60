//! Comment record and text validation.
//!
//! A [`Comment`] is immutable once created: there is no edit operation in
//! the protocol, only add and delete. The store assigns the id and the
//! creation timestamp; the timestamp drives history ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CommentId, PlaylistId, UserId};
use crate::error::HubError;

/// Maximum comment text length in characters, after trimming.
pub const MAX_TEXT_LEN: usize = 500;

/// Denormalized author display summary embedded in every outbound comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    /// The author's user id.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Avatar image reference, when the user has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// One comment on a playlist's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Store-assigned identifier.
    pub id: CommentId,
    /// Comment body, trimmed, 1..=[`MAX_TEXT_LEN`] characters.
    pub text: String,
    /// Resolved author summary.
    pub author: AuthorSummary,
    /// The playlist this comment belongs to.
    pub playlist_id: PlaylistId,
    /// Store-assigned creation time; history is ordered ascending by it.
    pub created_at: DateTime<Utc>,
}

/// Validates comment text: trims it, rejects empty and oversized input.
///
/// Returns the trimmed slice so callers persist exactly what was validated.
///
/// # Errors
///
/// Returns [`HubError::InvalidComment`] when the trimmed text is empty or
/// longer than [`MAX_TEXT_LEN`] characters.
pub fn validated_text(text: &str) -> Result<&str, HubError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(HubError::InvalidComment(
            "comment text must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(HubError::InvalidComment(format!(
            "comment text exceeds {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let Ok(text) = validated_text("  nice mix \n") else {
            panic!("expected valid text");
        };
        assert_eq!(text, "nice mix");
    }

    #[test]
    fn rejects_empty_after_trim() {
        assert!(validated_text("   \t\n").is_err());
        assert!(validated_text("").is_err());
    }

    #[test]
    fn accepts_exactly_max_len() {
        let text = "x".repeat(MAX_TEXT_LEN);
        assert!(validated_text(&text).is_ok());
    }

    #[test]
    fn rejects_over_max_len() {
        let text = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(validated_text(&text).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 500 multi-byte characters are exactly at the limit.
        let text = "é".repeat(MAX_TEXT_LEN);
        assert!(validated_text(&text).is_ok());
    }

    #[test]
    fn comment_serializes_camel_case() {
        let comment = Comment {
            id: CommentId::from("c1"),
            text: "nice mix".to_string(),
            author: AuthorSummary {
                id: UserId::from("u1"),
                username: "u1name".to_string(),
                avatar: None,
            },
            playlist_id: PlaylistId::from("p1"),
            created_at: Utc::now(),
        };
        let Ok(json) = serde_json::to_value(&comment) else {
            panic!("serialization failed");
        };
        assert_eq!(json["playlistId"], "p1");
        assert_eq!(json["author"]["username"], "u1name");
        assert!(json["createdAt"].is_string());
        // Absent avatar is omitted, not null.
        assert!(json["author"].get("avatar").is_none());
    }
}
