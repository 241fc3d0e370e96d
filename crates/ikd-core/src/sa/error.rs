//! SA module error types.

use thiserror::Error;

use super::keys::ChildSaKey;
use super::state::SaState;

/// Errors that can occur during SA lifecycle operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SaError {
    /// State transition not allowed by the SA state machine.
    #[error("transition from {from} to {to} is not allowed")]
    TransitionNotAllowed {
        /// The current state.
        from: SaState,
        /// The attempted target state.
        to: SaState,
    },

    /// A child SA with the same key already exists under the session.
    #[error("child SA {key} already exists")]
    ChildAlreadyExists {
        /// The duplicate tunnel key.
        key: ChildSaKey,
    },

    /// No child SA with the given key exists under the session.
    #[error("child SA {key} not found")]
    ChildNotFound {
        /// The missing tunnel key.
        key: ChildSaKey,
    },
}
