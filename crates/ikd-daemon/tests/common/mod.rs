//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use ikd_core::config::ChildConfig;
use ikd_core::rekey::RekeyPolicy;
use ikd_core::sa::{ChildSa, ChildSaKey, IkeSaId, IkeSession, Protocol, SaState};
use ikd_daemon::context::JobContext;
use ikd_daemon::negotiation::{Negotiation, NegotiationError};
use ikd_daemon::sa_store::SaStore;
use parking_lot::Mutex;

/// One recorded exchange request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub session: IkeSaId,
    pub protocol: Protocol,
    pub spi: u32,
}

/// Exchange-layer stub that records every request.
///
/// SPIs listed in `fail_spis` are rejected before recording; SPIs in
/// `panic_spis` panic, exercising the processor's unwind isolation.
#[derive(Default)]
pub struct RecordingNegotiation {
    calls: Mutex<Vec<Call>>,
    fail_spis: HashSet<u32>,
    panic_spis: HashSet<u32>,
}

impl RecordingNegotiation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, spi: u32) -> Self {
        self.fail_spis.insert(spi);
        self
    }

    pub fn panicking_on(mut self, spi: u32) -> Self {
        self.panic_spis.insert(spi);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn request(
        &self,
        op: &'static str,
        session: &IkeSession,
        protocol: Protocol,
        spi: u32,
    ) -> Result<(), NegotiationError> {
        if self.panic_spis.contains(&spi) {
            panic!("injected panic for spi 0x{spi:08x}");
        }
        if self.fail_spis.contains(&spi) {
            return Err(NegotiationError::InitiationFailed {
                reason: format!("injected failure for spi 0x{spi:08x}"),
            });
        }
        self.calls.lock().push(Call {
            op,
            session: session.id(),
            protocol,
            spi,
        });
        Ok(())
    }
}

impl Negotiation for RecordingNegotiation {
    fn rekey_child_sa(
        &self,
        session: &mut IkeSession,
        protocol: Protocol,
        spi: u32,
    ) -> Result<(), NegotiationError> {
        self.request("rekey", session, protocol, spi)
    }

    fn delete_child_sa(
        &self,
        session: &mut IkeSession,
        protocol: Protocol,
        spi: u32,
    ) -> Result<(), NegotiationError> {
        self.request("delete", session, protocol, spi)
    }
}

pub fn dst() -> IpAddr {
    "10.0.0.1".parse().unwrap()
}

pub fn child_key(spi: u32) -> ChildSaKey {
    ChildSaKey::new(Protocol::Esp, spi, dst())
}

pub fn child_config(policy: RekeyPolicy) -> ChildConfig {
    ChildConfig {
        rekey_policy: policy,
        ..ChildConfig::default()
    }
}

/// Register a session holding one established child with the given policy.
pub fn add_session_with_child(
    store: &SaStore,
    id: IkeSaId,
    state: SaState,
    spi: u32,
    policy: RekeyPolicy,
) {
    let mut session = IkeSession::new(id, state);
    session
        .add_child(ChildSa::new(child_key(spi), child_config(policy)))
        .unwrap();
    store.insert_session(session).unwrap();
}

/// Store + recording stub + context, ready for a processor.
pub fn test_context() -> (Arc<SaStore>, Arc<RecordingNegotiation>, Arc<JobContext>) {
    test_context_with(RecordingNegotiation::new())
}

pub fn test_context_with(
    negotiation: RecordingNegotiation,
) -> (Arc<SaStore>, Arc<RecordingNegotiation>, Arc<JobContext>) {
    let store = Arc::new(SaStore::new());
    let negotiation = Arc::new(negotiation);
    let ctx = Arc::new(JobContext::new(
        Arc::clone(&store),
        Arc::clone(&negotiation) as Arc<dyn Negotiation>,
    ));
    (store, negotiation, ctx)
}
