//! Rekey trigger for one tunnel-level SA.

use std::net::IpAddr;

use ikd_core::rekey::{self, RekeyDecision};
use ikd_core::sa::{ChildSaKey, Protocol};
use tracing::{debug, info};

use super::{JobError, Requeue};
use crate::context::JobContext;

/// Checks the rekey policy of one tunnel and, if it applies, asks the
/// exchange layer to rekey it.
///
/// One-shot: the job always terminates with [`Requeue::None`]; the next
/// trigger is scheduled independently by a fresh timer. The SA having
/// disappeared by the time the job runs is an expected race with teardown,
/// logged and otherwise ignored.
#[derive(Debug)]
pub struct RekeyChildSaJob {
    key: ChildSaKey,
}

impl RekeyChildSaJob {
    /// Create a rekey trigger for the tunnel (protocol, inbound SPI, dst).
    ///
    /// The identity is copied into the job; it shares nothing with the
    /// triggering event.
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
            debug!(child_sa = %self.key, "CHILD_SA not found for rekey");
            return Ok(Requeue::None);
        };

        let Some(child) = session.child() else {
            debug!(child_sa = %self.key, "CHILD_SA not found for rekey");
            return Ok(Requeue::None);
        };
        let policy = child.config().rekey_policy;
        let usage = child.usage();

        match rekey::decide(session.state(), policy, usage) {
            RekeyDecision::Skip(reason) => {
                info!(child_sa = %self.key, %reason, "CHILD_SA not rekeying");
            },
            RekeyDecision::Rekey => {
                info!(child_sa = %self.key, "CHILD_SA rekeying now");
                ctx.negotiation()
                    .rekey_child_sa(&mut session, self.key.protocol, self.key.spi)?;
            },
        }
        Ok(Requeue::None)
    }
}
