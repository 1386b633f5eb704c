//! Error types and handling for `issue_tracker`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Storage and serialization failures convert via `#[from]`
//! - The HTTP layer is the single point where these errors are folded
//!   into the fixed JSON wire contract; nothing here leaks to clients

use thiserror::Error;

/// Primary error type for `issue_tracker` operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    // === Storage Errors ===
    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Document Errors ===
    /// Document identifier is not a valid ULID.
    #[error("Invalid document ID: {id}")]
    InvalidId { id: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Configuration Errors ===
    /// Configuration or startup error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-identifier error.
    #[must_use]
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }
}

/// Result type using `TrackerError`.
pub type Result<T> = std::result::Result<T, TrackerError>;
