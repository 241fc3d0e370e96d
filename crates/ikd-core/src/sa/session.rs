//! Session-level SA.

use std::collections::HashMap;

use super::child::ChildSa;
use super::error::SaError;
use super::keys::{ChildSaKey, IkeSaId};
use super::state::SaState;

/// A session-level SA and the tunnel-level SAs negotiated under it.
///
/// The session is the lock granularity of the SA store: whoever has the
/// session checked out has exclusive access to every child under it, since a
/// child mutation also touches session bookkeeping.
#[derive(Debug)]
pub struct IkeSession {
    id: IkeSaId,
    state: SaState,
    children: HashMap<ChildSaKey, ChildSa>,
}

impl IkeSession {
    /// Create a session in the given initial state.
    ///
    /// `Established` for a completed negotiation, `Passive` for a standby
    /// placeholder.
    #[must_use]
    pub fn new(id: IkeSaId, state: SaState) -> Self {
        Self {
            id,
            state,
            children: HashMap::new(),
        }
    }

    /// The session identity (SPI pair).
    #[must_use]
    pub const fn id(&self) -> IkeSaId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SaState {
        self.state
    }

    /// True for placeholder sessions that never carry traffic.
    #[must_use]
    pub const fn is_passive(&self) -> bool {
        self.state.is_passive()
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

    /// Add a newly negotiated child SA to the session.
    pub fn add_child(&mut self, child: ChildSa) -> Result<(), SaError> {
        let key = *child.key();
        if self.children.contains_key(&key) {
            return Err(SaError::ChildAlreadyExists { key });
        }
        self.children.insert(key, child);
        Ok(())
    }

    /// Remove and return the child SA with the given key.
    pub fn remove_child(&mut self, key: &ChildSaKey) -> Option<ChildSa> {
        self.children.remove(key)
    }

    /// Look up a child SA by key.
    #[must_use]
    pub fn child(&self, key: &ChildSaKey) -> Option<&ChildSa> {
        self.children.get(key)
    }

    /// Look up a child SA by key, mutably.
    pub fn child_mut(&mut self, key: &ChildSaKey) -> Option<&mut ChildSa> {
        self.children.get_mut(key)
    }

    /// Keys of all children currently owned by the session.
    pub fn child_keys(&self) -> impl Iterator<Item = &ChildSaKey> {
        self.children.keys()
    }

    /// Number of children owned by the session.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
