//! Hub error types with numeric error codes.
//!
//! [`HubError`] is the central error type. No error here ever crashes the
//! hub or disconnects an unrelated client: failures are logged and, where
//! the protocol allows, reported back to the requesting connection as an
//! `error` frame carrying the numeric code.

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        |
/// |-----------|-----------------|
/// | 1000–1999 | Validation      |
/// | 2000–2999 | Not Found       |
/// | 3000–3999 | Store / Server  |
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Comment text failed validation (empty or oversized).
    #[error("invalid comment: {0}")]
    InvalidComment(String),

    /// Comment store failure (persistence layer).
    #[error("store error: {0}")]
    StoreError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidComment(_) => 1001,
            Self::StoreError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }
}
