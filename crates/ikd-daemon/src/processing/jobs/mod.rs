//! Job variants and their execution contract.
//!
//! [`Job`] is a closed set of variants so the processor stays
//! variant-agnostic while dispatch remains a plain match. Every variant owns
//! its payload outright: a job may execute on an arbitrary worker at an
//! arbitrary later time, long after the triggering network buffer or timer
//! is gone.

mod delete_child_sa;
mod rekey_child_sa;
#[cfg(test)]
mod scripted;

pub use delete_child_sa::DeleteChildSaJob;
pub use rekey_child_sa::RekeyChildSaJob;
#[cfg(test)]
pub use scripted::ScriptedJob;

use ikd_core::sa::SaError;
use thiserror::Error;

use crate::context::JobContext;
use crate::negotiation::NegotiationError;

/// Priority band of a queued job. Higher bands are always drained first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobPriority {
    /// Must run before anything else (e.g. liveness responses).
    Critical,
    /// Time-sensitive protocol work such as deletes.
    High,
    /// Routine maintenance such as rekey triggers.
    Medium,
    /// Background housekeeping.
    Low,
}

impl JobPriority {
    /// Number of priority bands.
    pub const COUNT: usize = 4;

    /// Queue band index; band 0 drains first.
    #[must_use]
    pub const fn band(self) -> usize {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Stable string form used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A job's instruction to the processor after one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requeue {
    /// Terminal: destroy the job.
    None,
    /// Reinsert at the back of the job's priority band, yielding to queued
    /// peers of equal or higher priority.
    Fair,
    /// Reinsert at the front of the queue; may be picked up again
    /// immediately, even by the same worker.
    Direct,
}

/// Errors surfacing from a job execution.
///
/// Caught at the worker boundary: the processor logs the error and drops the
/// job, equivalent to [`Requeue::None`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JobError {
    /// The exchange layer refused or failed to initiate an exchange.
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// An SA mutation was rejected.
    #[error(transparent)]
    Sa(#[from] SaError),
}

/// A unit of deferred work.
#[derive(Debug)]
pub enum Job {
    /// Trigger a rekey of one tunnel-level SA.
    RekeyChildSa(RekeyChildSaJob),
    /// Trigger teardown of one tunnel-level SA.
    DeleteChildSa(DeleteChildSaJob),
    /// Replays a fixed requeue script, recording each execution.
    #[cfg(test)]
    Scripted(ScriptedJob),
}

impl Job {
    /// The band this job is queued in.
    #[must_use]
    pub const fn priority(&self) -> JobPriority {
        match self {
            Self::RekeyChildSa(_) => JobPriority::Medium,
            Self::DeleteChildSa(_) => JobPriority::High,
            #[cfg(test)]
            Self::Scripted(job) => job.priority(),
        }
    }

    /// Variant name used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RekeyChildSa(_) => "rekey_child_sa",
            Self::DeleteChildSa(_) => "delete_child_sa",
            #[cfg(test)]
            Self::Scripted(_) => "scripted",
        }
    }

    /// Execute one step of the job.
    ///
    /// Returns the requeue directive on success. An error is terminal: the
    /// processor logs it and destroys the job.
    pub fn execute(&mut self, ctx: &JobContext) -> Result<Requeue, JobError> {
        match self {
            Self::RekeyChildSa(job) => job.execute(ctx),
            Self::DeleteChildSa(job) => job.execute(ctx),
            #[cfg(test)]
            Self::Scripted(job) => Ok(job.execute()),
        }
    }
}
