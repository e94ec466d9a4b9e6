//! Unified error types for the product catalog.
//!
//! Validation failures raised by the catalog itself share a single variant so that
//! callers can tell "your data was bad" apart from everything the store reports.
//! Store errors are passed through untouched.

use sea_orm::DbErr;
use thiserror::Error;

/// All errors produced by the product catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// The product data or lifecycle state did not satisfy the model's rules.
    #[error("{message}")]
    DataValidation {
        /// Human-readable description of what was rejected
        message: String,
    },

    /// Error reported by the underlying database, unchanged.
    #[error(transparent)]
    Database(#[from] DbErr),

    /// Settings could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading settings
        message: String,
    },

    /// I/O failure outside the database (settings files, stdout).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::DataValidation`] from anything string-like.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
