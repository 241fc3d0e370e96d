//! Tunnel-level SA.

use crate::config::ChildConfig;
use crate::usage::{UsageCounters, UsageSnapshot};

use super::error::SaError;
use super::keys::ChildSaKey;
use super::state::SaState;

/// A tunnel-level SA protecting one data flow.
///
/// Owned by its [`IkeSession`](super::IkeSession); mutated only while the
/// owning session is checked out of the SA store.
#[derive(Debug, Clone)]
pub struct ChildSa {
    key: ChildSaKey,
    state: SaState,
    config: ChildConfig,
    usage: UsageCounters,
}

impl ChildSa {
    /// Create a newly negotiated child SA in `Established` state.
    #[must_use]
    pub const fn new(key: ChildSaKey, config: ChildConfig) -> Self {
        Self {
            key,
            state: SaState::Established,
            config,
            usage: UsageCounters::new(),
        }
    }

    /// The tunnel identity key.
    #[must_use]
    pub const fn key(&self) -> &ChildSaKey {
        &self.key
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SaState {
        self.state
    }

    /// Resolved configuration, fixed for the SA's life.
    #[must_use]
    pub const fn config(&self) -> &ChildConfig {
        &self.config
    }

    /// Transition to `next`, validating against the state machine.
    pub fn set_state(&mut self, next: SaState) -> Result<(), SaError> {
        if !self.state.can_transition_to(next) {
            return Err(SaError::TransitionNotAllowed {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Record traffic processed by this SA.
    pub fn record_usage(&mut self, bytes: u64, packets: u64) {
        self.usage.record(bytes, packets);
    }

    /// Snapshot the usage counters without resetting them.
    #[must_use]
    pub const fn usage(&self) -> UsageSnapshot {
        self.usage.snapshot()
    }

    /// Reset the usage counters, e.g. after a completed rekey.
    pub fn reset_usage(&mut self) {
        self.usage.reset();
    }
}
