//! Unified error types for the ticket service.
//!
//! Core operations return [`Error`]; the HTTP layer maps each variant onto a
//! status code (see [`crate::api::error`]).

use thiserror::Error;

/// All errors produced by the ticket service.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied data failed a required-field or enum check
    #[error("{message}")]
    Validation {
        /// Human-readable description returned to the caller
        message: String,
    },

    /// No ticket matches the requested id
    #[error("Ticket no encontrado")]
    TicketNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Underlying persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what was wrong
        message: String,
    },

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::Validation`] from any message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
