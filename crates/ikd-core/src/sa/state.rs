//! SA lifecycle state machine.

use std::fmt;

/// Lifecycle state shared by session-level and tunnel-level SAs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaState {
    /// Key exchange in progress; no traffic keys installed yet.
    Negotiating,
    /// Keys installed, SA carries traffic.
    Established,
    /// A replacement SA is being negotiated while this one stays active.
    Rekeying,
    /// Teardown exchange in progress.
    Deleting,
    /// Placeholder session that never carries traffic (e.g. a standby
    /// peer's mirror of a remote session). Never rekeyed.
    Passive,
}

impl SaState {
    /// Stable string form used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Negotiating => "NEGOTIATING",
            Self::Established => "ESTABLISHED",
            Self::Rekeying => "REKEYING",
            Self::Deleting => "DELETING",
            Self::Passive => "PASSIVE",
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Deleting is terminal. Passive sessions can only activate (a standby
    /// taking over) or tear down. Self-transitions are not transitions.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Negotiating, Self::Established | Self::Deleting)
                | (Self::Established, Self::Rekeying | Self::Deleting)
                | (Self::Rekeying, Self::Established | Self::Deleting)
                | (Self::Passive, Self::Established | Self::Deleting)
        )
    }

    /// True for placeholder sessions exempt from rekeying.
    #[must_use]
    pub const fn is_passive(&self) -> bool {
        matches!(self, Self::Passive)
    }
}

impl fmt::Display for SaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
