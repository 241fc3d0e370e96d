//! SA store error types.

use ikd_core::sa::{ChildSaKey, IkeSaId, SaError};
use thiserror::Error;

/// Errors that can occur while mutating the SA store registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SaStoreError {
    /// A session with this identity is already registered.
    #[error("session {id} already registered")]
    DuplicateSession {
        /// The duplicate session identity.
        id: IkeSaId,
    },

    /// No session with this identity is registered.
    #[error("session {id} not found")]
    SessionNotFound {
        /// The missing session identity.
        id: IkeSaId,
    },

    /// A child with this key is already indexed, possibly under another
    /// session.
    #[error("child SA {key} already indexed")]
    DuplicateChildKey {
        /// The duplicate tunnel key.
        key: ChildSaKey,
    },

    /// An SA-level operation failed while the registry was being updated.
    #[error(transparent)]
    Sa(#[from] SaError),
}
