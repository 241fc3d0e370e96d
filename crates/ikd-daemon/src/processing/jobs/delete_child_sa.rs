//! Delete trigger for one tunnel-level SA.

use std::net::IpAddr;

use ikd_core::sa::{ChildSaKey, Protocol, SaState};
use tracing::{debug, info};

use super::{JobError, Requeue};
use crate::context::JobContext;

/// Asks the exchange layer to tear down one tunnel.
///
/// Marks the child `Deleting` before handing off so a duplicate trigger for
/// the same tunnel becomes a no-op. Runs at high priority: a tunnel flagged
/// for deletion (expiry, policy removal) should stop carrying traffic before
/// routine maintenance work proceeds.
#[derive(Debug)]
pub struct DeleteChildSaJob {
    key: ChildSaKey,
}

impl DeleteChildSaJob {
    /// Create a delete trigger for the tunnel (protocol, inbound SPI, dst).
    #[must_use]
    pub const fn new(protocol: Protocol, spi: u32, dst: IpAddr) -> Self {
        Self {
            key: ChildSaKey::new(protocol, spi, dst),
        }
    }

    /// The targeted tunnel key.
    #[must_use]
    pub const fn key(&self) -> &ChildSaKey {
        &self.key
    }

    pub(super) fn execute(&mut self, ctx: &JobContext) -> Result<Requeue, JobError> {
        let Some(mut session) = ctx.sa_store().checkout_child(&self.key) else {
            debug!(child_sa = %self.key, "CHILD_SA not found for delete");
            return Ok(Requeue::None);
        };

        let Some(child) = session.child_mut() else {
            debug!(child_sa = %self.key, "CHILD_SA not found for delete");
            return Ok(Requeue::None);
        };
        if child.state() == SaState::Deleting {
            debug!(child_sa = %self.key, "CHILD_SA already deleting");
            return Ok(Requeue::None);
        }
        child.set_state(SaState::Deleting)?;

        info!(child_sa = %self.key, "CHILD_SA deleting");
        ctx.negotiation()
            .delete_child_sa(&mut session, self.key.protocol, self.key.spi)?;
        Ok(Requeue::None)
    }
}
