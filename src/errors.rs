//! Unified error types for the marketplace backend.
//!
//! Every fallible operation in `core` returns [`Result`]. The variants mirror the
//! failure classes the booking engine distinguishes; the HTTP layer maps each one
//! to a status code in [`crate::api::error`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A referenced user, item, booking or request does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Malformed input that reached the core.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Booking start/end violate ordering or must-be-in-the-future rules.
    #[error("Invalid booking interval: {message}")]
    InvalidInterval { message: String },

    /// The operation is not permitted given the current entity state.
    #[error("{message}")]
    InvalidState { message: String },

    /// The actor lacks the required relationship to the entity.
    #[error("{message}")]
    Forbidden { message: String },

    #[error("Unknown state: {state}")]
    UnsupportedState { state: String },

    /// A unique constraint (user email) would be violated.
    #[error("{message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
