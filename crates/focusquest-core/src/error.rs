//! Core error types for focusquest-core.
//!
//! This module defines a comprehensive error hierarchy using thiserror
//! for better error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Store-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Data-store errors.
///
/// `Constraint` and `NotFound` are distinguished from plain query
/// failures so the facade can map them to user-recoverable outcomes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Unique/foreign-key constraint violated (e.g. duplicate club membership)
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
///
/// These are rejected before any store call is made.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// XP gains must be non-negative
    #[error("XP gain must be non-negative, got {amount}")]
    NegativeXpGain { amount: i64 },

    /// Task titles must contain at least one non-whitespace character
    #[error("Task title must not be empty")]
    EmptyTaskTitle,

    /// Only one focus session may be active at a time
    #[error("A focus session is already active")]
    SessionAlreadyActive,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) => match e.code {
                rusqlite::ErrorCode::ConstraintViolation => StoreError::Constraint(
                    msg.clone().unwrap_or_else(|| e.to_string()),
                ),
                rusqlite::ErrorCode::DatabaseLocked => StoreError::Locked,
                _ => StoreError::QueryFailed(err.to_string()),
            },
            rusqlite::Error::QueryReturnedNoRows => {
                StoreError::NotFound("query returned no rows".into())
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
