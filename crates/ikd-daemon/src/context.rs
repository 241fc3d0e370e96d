//! Dependency bundle handed to executing jobs.

use std::sync::Arc;

use crate::negotiation::Negotiation;
use crate::sa_store::SaStore;

/// Collaborators a job may use during execution.
///
/// Constructed once at daemon startup and shared by every worker; jobs
/// receive it by reference instead of reaching for globals.
pub struct JobContext {
    sa_store: Arc<SaStore>,
    negotiation: Arc<dyn Negotiation>,
}

impl JobContext {
    /// Bundle the SA store and the exchange-layer seam.
    #[must_use]
    pub fn new(sa_store: Arc<SaStore>, negotiation: Arc<dyn Negotiation>) -> Self {
        Self {
            sa_store,
            negotiation,
        }
    }

    /// The SA store.
    #[must_use]
    pub fn sa_store(&self) -> &SaStore {
        &self.sa_store
    }

    /// The exchange-layer seam.
    #[must_use]
    pub fn negotiation(&self) -> &dyn Negotiation {
        &*self.negotiation
    }
}
