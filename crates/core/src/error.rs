//! Domain error shared by every StoreHub crate.
//!
//! Each variant carries a stable machine-readable [`code`](CoreError::code)
//! that the HTTP layer puts in the `code` field of error bodies.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A store, catalog row, cart line or order does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Bad input: out-of-range positions, category cycles, bad discounts...
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request clashes with current state, e.g. deleting a category
    /// that still has children.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed, e.g. an admin touching another
    /// admin's store.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }

    /// Stable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
