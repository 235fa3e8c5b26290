//! Unified error type for the agency desk.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation failures are
//! reported before any state changes, so callers can surface them without rolling
//! anything back.

use thiserror::Error;

/// All errors produced by the store, the persistence layer and configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// A required field is missing or a cross-field constraint is violated
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// A monetary amount that must be positive was zero, negative or not finite
    #[error("Invalid {field}: {amount} (must be greater than zero)")]
    InvalidAmount {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        amount: f64,
    },

    /// No adviser with the given id exists
    #[error("Adviser not found: {id}")]
    AdviserNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No policy with the given id exists
    #[error("Policy not found: {id}")]
    PolicyNotFound {
        /// The id that was looked up
        id: String,
    },

    /// A stored snapshot entry could not be decoded
    #[error("Corrupt snapshot entry '{key}': {source}")]
    Snapshot {
        /// Storage key of the entry
        key: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Text report formatting failure
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors that reject caller input rather than signal a fault.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidAmount { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
