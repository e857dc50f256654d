//! Repository Errors
//!
//! Error types for repository operations. The `Display` text is what a
//! client sees in the `error` field of a failed response.

/// Errors that can occur in the repository
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// By-id lookup matched zero rows
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Requested quantity exceeds the album's stock
    #[error("album {album_id} out of stock or insufficient stock (have={have}, want={want})")]
    InsufficientStock { album_id: i64, have: i32, want: i32 },

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Create a not-found error for an album
    pub fn album_not_found(id: i64) -> Self {
        Self::NotFound { entity: "album", id }
    }

    /// Create a not-found error for a user
    pub fn user_not_found(id: i64) -> Self {
        Self::NotFound { entity: "user", id }
    }

    /// Check if this error is a not-found lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a client error (retrying the same request won't help)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InsufficientStock { .. })
    }
}
