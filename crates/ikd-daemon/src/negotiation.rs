//! Seam to the negotiation (exchange) layer.
//!
//! The job engine never parses or sends IKE messages itself. When a job
//! decides an exchange must happen, it calls this trait on the checked-out
//! session and forgets about it; the exchange layer owns all subsequent
//! packet handling.

use ikd_core::sa::{IkeSession, Protocol};
use thiserror::Error;

/// Operations the job engine can request from the exchange layer.
///
/// Implementations are fire-and-forget from the caller's perspective: a
/// returned `Ok` means the exchange was initiated, not that it completed.
/// The session is passed mutably because initiating an exchange updates
/// session bookkeeping (state, message ids).
pub trait Negotiation: Send + Sync {
    /// Begin a rekey exchange for the tunnel (protocol, spi) under `session`.
    fn rekey_child_sa(
        &self,
        session: &mut IkeSession,
        protocol: Protocol,
        spi: u32,
    ) -> Result<(), NegotiationError>;

    /// Begin a delete exchange for the tunnel (protocol, spi) under `session`.
    fn delete_child_sa(
        &self,
        session: &mut IkeSession,
        protocol: Protocol,
        spi: u32,
    ) -> Result<(), NegotiationError>;
}

/// Errors reported by the exchange layer when initiating an exchange.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NegotiationError {
    /// No exchange backend is attached.
    #[error("negotiation backend unavailable: {reason}")]
    Unavailable {
        /// Why the backend is unavailable.
        reason: String,
    },

    /// The backend rejected the exchange.
    #[error("exchange initiation failed: {reason}")]
    InitiationFailed {
        /// Backend-reported failure reason.
        reason: String,
    },
}

/// Stand-in backend used until an exchange layer is attached.
///
/// Every operation fails with [`NegotiationError::Unavailable`]; the
/// processor logs and drops the requesting job.
#[derive(Debug, Default)]
pub struct NullNegotiation;

impl Negotiation for NullNegotiation {
    fn rekey_child_sa(
        &self,
        _session: &mut IkeSession,
        _protocol: Protocol,
        _spi: u32,
    ) -> Result<(), NegotiationError> {
        Err(NegotiationError::Unavailable {
            reason: "no exchange layer attached".to_string(),
        })
    }

    fn delete_child_sa(
        &self,
        _session: &mut IkeSession,
        _protocol: Protocol,
        _spi: u32,
    ) -> Result<(), NegotiationError> {
        Err(NegotiationError::Unavailable {
            reason: "no exchange layer attached".to_string(),
        })
    }
}
