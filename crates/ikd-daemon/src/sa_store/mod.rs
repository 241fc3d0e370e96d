//! Keyed, lockable registry of live SAs.
//!
//! The store owns every live [`IkeSession`]. Jobs get at a session through
//! *checkout*: an exclusive, blocking acquisition that serializes all work on
//! one session while leaving unrelated sessions untouched.
//!
//! # Lock granularity
//!
//! Lookup is tunnel-keyed, locking is session-keyed. A rekey of one tunnel
//! also touches its session's bookkeeping, so the session is the unit of
//! exclusion; but a session can own many tunnels, and work on tunnels under
//! *different* sessions must never contend. The registry therefore maps
//! [`ChildSaKey`] to the owning [`IkeSaId`], and each session carries its own
//! lock. This asymmetry is deliberate.
//!
//! # Contracts
//!
//! - The registry lock is never held while waiting on a session lock, so a
//!   long-checked-out session cannot stall lookups of other sessions.
//! - Checkin is release-on-drop: [`CheckedOutSession`] releases the session
//!   lock exactly once on every exit path, including unwinding.
//! - A checkout that races with teardown revalidates after acquiring the
//!   session lock and reports not-found; callers treat that as an expected
//!   race, not a fault.

mod error;

pub use error::SaStoreError;

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use ikd_core::sa::{ChildSa, ChildSaKey, IkeSaId, IkeSession};
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

type SessionLock = Arc<Mutex<IkeSession>>;

/// Exclusive handle to a checked-out session.
///
/// Dereferences to the [`IkeSession`]. Dropping the handle is the checkin:
/// the next waiting checkout of the same session proceeds.
pub struct CheckedOutSession {
    guard: ArcMutexGuard<RawMutex, IkeSession>,
    child: Option<ChildSaKey>,
}

impl CheckedOutSession {
    /// The tunnel key this checkout was resolved through, if any.
    #[must_use]
    pub const fn child_key(&self) -> Option<&ChildSaKey> {
        self.child.as_ref()
    }

    /// The child SA this checkout was resolved through.
    ///
    /// `None` for session-level checkouts, or if the child was removed
    /// through this same handle.
    #[must_use]
    pub fn child(&self) -> Option<&ChildSa> {
        self.guard.child(self.child.as_ref()?)
    }

    /// Mutable access to the child SA this checkout was resolved through.
    pub fn child_mut(&mut self) -> Option<&mut ChildSa> {
        let key = self.child?;
        self.guard.child_mut(&key)
    }
}

impl Deref for CheckedOutSession {
    type Target = IkeSession;

    fn deref(&self) -> &IkeSession {
        &self.guard
    }
}

impl DerefMut for CheckedOutSession {
    fn deref_mut(&mut self) -> &mut IkeSession {
        &mut self.guard
    }
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<IkeSaId, SessionLock>,
    children: HashMap<ChildSaKey, IkeSaId>,
}

/// Registry of live SAs with exclusive per-session checkout.
#[derive(Default)]
pub struct SaStore {
    registry: Mutex<Registry>,
}

impl SaStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session, indexing any children it already owns.
    ///
    /// Rejects the whole insert if the session identity or any child key is
    /// already registered.
    pub fn insert_session(&self, session: IkeSession) -> Result<(), SaStoreError> {
        let mut registry = self.registry.lock();
        let id = session.id();
        if registry.sessions.contains_key(&id) {
            return Err(SaStoreError::DuplicateSession { id });
        }
        for key in session.child_keys() {
            if registry.children.contains_key(key) {
                return Err(SaStoreError::DuplicateChildKey { key: *key });
            }
        }
        for key in session.child_keys() {
            registry.children.insert(*key, id);
        }
        registry.sessions.insert(id, Arc::new(Mutex::new(session)));
        Ok(())
    }

    /// Remove a session and unindex all of its children.
    ///
    /// Returns `false` if no such session is registered. A concurrent holder
    /// of a checkout keeps the detached session alive until checkin; its
    /// mutations are unobservable afterwards.
    pub fn remove_session(&self, id: IkeSaId) -> bool {
        let mut registry = self.registry.lock();
        if registry.sessions.remove(&id).is_none() {
            return false;
        }
        registry.children.retain(|_, owner| *owner != id);
        true
    }

    /// Add a child SA to a registered session and index its key.
    ///
    /// The index entry is published before the session lock is taken; a
    /// concurrent `checkout_child` racing this call observes not-found until
    /// the child is actually in place.
    pub fn register_child(&self, id: IkeSaId, child: ChildSa) -> Result<(), SaStoreError> {
        let key = *child.key();
        let lock = {
            let mut registry = self.registry.lock();
            if registry.children.contains_key(&key) {
                return Err(SaStoreError::DuplicateChildKey { key });
            }
            let lock = registry
                .sessions
                .get(&id)
                .ok_or(SaStoreError::SessionNotFound { id })?
                .clone();
            registry.children.insert(key, id);
            lock
        };

        let mut session = lock.lock();
        if let Err(err) = session.add_child(child) {
            drop(session);
            self.registry.lock().children.remove(&key);
            return Err(err.into());
        }
        Ok(())
    }

    /// Remove a child SA by key, unindexing it first.
    pub fn unregister_child(&self, key: &ChildSaKey) -> Option<ChildSa> {
        let lock = {
            let mut registry = self.registry.lock();
            let id = registry.children.remove(key)?;
            registry.sessions.get(&id)?.clone()
        };
        let mut session = lock.lock();
        session.remove_child(key)
    }

    /// Check out the session owning the tunnel with the given key.
    ///
    /// Blocks while another checkout of the same session is outstanding.
    /// Returns `None` if no matching SA exists, including when the child was
    /// torn down between the index lookup and the lock acquisition.
    pub fn checkout_child(&self, key: &ChildSaKey) -> Option<CheckedOutSession> {
        let lock = {
            let registry = self.registry.lock();
            let id = registry.children.get(key)?;
            registry.sessions.get(id)?.clone()
        };
        let guard = lock.lock_arc();
        if guard.child(key).is_none() {
            return None;
        }
        Some(CheckedOutSession {
            guard,
            child: Some(*key),
        })
    }

    /// Check out a session by its own identity.
    ///
    /// Blocks while another checkout of the same session is outstanding.
    pub fn checkout(&self, id: IkeSaId) -> Option<CheckedOutSession> {
        let lock = {
            let registry = self.registry.lock();
            registry.sessions.get(&id)?.clone()
        };
        Some(CheckedOutSession {
            guard: lock.lock_arc(),
            child: None,
        })
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.registry.lock().sessions.len()
    }

    /// Number of indexed tunnel keys.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.registry.lock().children.len()
    }
}
