//! Contract error types for the contacts service
//!
//! These errors are transport-agnostic; the REST layer maps them onto
//! Problem Details responses.

use thiserror::Error;

/// Contacts service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactsError {
    /// Contact or user not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (contact, user)
        resource: String,
        /// Resource identifier
        id: String,
        /// Client-facing message
        message: String,
    },
    /// Uniqueness conflict (username, email)
    #[error("Conflict: {reason}")]
    Conflict { reason: String },
    /// Request is well-formed but rejected by a business rule
    #[error("Bad request: {reason}")]
    BadRequest { reason: String },
    /// Input failed field validation
    #[error("Validation error: {message}")]
    Validation { message: String },
    /// Missing, invalid or expired credentials
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },
    /// Authenticated but not allowed
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },
    /// Request budget exhausted for this client
    #[error("Too many requests")]
    TooManyRequests,
    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl ContactsError {
    pub fn contact_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "contact".to_string(),
            id: id.to_string(),
            message: crate::domain::messages::CONTACT_NOT_FOUND.to_string(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }
}
