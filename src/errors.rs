//! Unified error type for the course sales desk.
//!
//! Every fallible operation returns [`Result`]. Validation failures carry a
//! message meant to be shown next to the offending form field; everything
//! else is scoped to the single interaction that triggered it.

use thiserror::Error;

/// Errors produced by data access, validation and configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Input rejected before reaching the store
    #[error("{message}")]
    Validation {
        /// User-facing explanation
        message: String,
    },

    /// A record referenced by id does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. `"course"`
        entity: &'static str,
        /// The id that was looked up
        id: i64,
    },

    /// The acting role may not attempt this action
    #[error("Role '{role}' is not allowed to {action}")]
    PermissionDenied {
        /// Acting role
        role: String,
        /// Attempted action
        action: String,
    },

    /// Store call failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error while exporting or reading files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet writer rejected a sheet or could not save the workbook
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
