//! Errors surfaced by the remote user store.

use roster_core::UserId;
use thiserror::Error;

/// Errors that can occur when talking to the user store.
///
/// Transport, status and decode failures all collapse into [`StoreError::Api`]
/// so callers only branch on "missing" versus "everything else".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Request failed, returned a non-success status, or sent an unreadable body.
    #[error("Store API error: {0}")]
    Api(String),

    /// The addressed record does not exist.
    #[error("User not found: {0}")]
    NotFound(UserId),
}

impl StoreError {
    /// Whether this error means the record is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
