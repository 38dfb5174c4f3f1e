//! Unified error types for the retainer ledger.
//!
//! All fallible operations in this crate return [`Result`]. Degenerate inputs
//! (absent dates, missing contracts, empty ranges) are not errors — they
//! produce zero quantities or empty sequences. Errors are reserved for bad
//! caller input and storage-layer failures, which abort the enclosing
//! transaction.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or validation problem described by a message.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// The referenced agreement does not exist.
    #[error("Agreement not found: {id}")]
    AgreementNotFound {
        /// Primary key that failed to resolve
        id: i64,
    },

    /// The referenced issue does not exist.
    #[error("Issue not found: {id}")]
    IssueNotFound {
        /// Primary key that failed to resolve
        id: i64,
    },

    /// A monetary amount or hour count failed validation.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// A month number outside 1..=12.
    #[error("Invalid month: {month}")]
    InvalidMonth {
        /// The rejected month number
        month: i32,
    },

    /// Storage-layer failure; aborts the enclosing transaction.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
