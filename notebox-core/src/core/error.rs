//! Error types for the Notebox core library.

use thiserror::Error;

/// All errors that can occur within the Notebox core library.
#[derive(Debug, Error)]
pub enum NoteboxError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database on disk was set up by a newer version than the one requested.
    #[error("Store version {stored} is newer than requested version {requested}")]
    VersionMismatch { stored: u32, requested: u32 },

    /// The opened file claims the requested version but lacks the notes table or its indexes.
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// The store handle could not be reached (not opened, poisoned lock, or a failed worker).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`NoteboxError`].
pub type Result<T> = std::result::Result<T, NoteboxError>;

impl NoteboxError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::VersionMismatch { .. } => {
                "This note store was created by a newer version of Notebox".to_string()
            }
            Self::InvalidStore(_) => "Could not open the note store".to_string(),
            Self::Unavailable(_) => "The note store is not available".to_string(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
