//! Domain layer: comment records, identifier newtypes, text validation.

pub mod comment;
pub mod ids;

pub use comment::{AuthorSummary, Comment, MAX_TEXT_LEN, validated_text};
pub use ids::{CommentId, PlaylistId, UserId};
