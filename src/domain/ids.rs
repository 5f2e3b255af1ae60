//! Opaque identifier newtypes for comments, playlists, and users.
//!
//! All three are thin wrappers around `String` so the hub never assumes
//! anything about the id format used by the external user/playlist
//! collaborators. [`CommentId`] values minted by a store use UUID v4.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Store-assigned identifier of a comment record.
    CommentId
}

string_id! {
    /// Reference to a playlist; existence is never validated at this layer.
    PlaylistId
}

string_id! {
    /// Reference to a user identity supplied by the client.
    UserId
}

impl CommentId {
    /// Mints a fresh store-assigned comment id (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
