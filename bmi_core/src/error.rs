//! Error types for the bmi_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bmi_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Weight or height was not a positive number
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An entry already exists for the current calendar day
    #[error("An entry has already been recorded today")]
    AlreadyRecordedToday,

    /// Edit or delete targeted a position that does not exist
    #[error("No entry at index {index} (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Key-value backend failure not covered by the IO variant
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the error came from reading or writing stored data.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence(_) | Error::Io(_) | Error::Json(_))
    }

    /// True for conditions the user caused and can correct themselves.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::AlreadyRecordedToday | Error::IndexOutOfRange { .. }
        )
    }
}
