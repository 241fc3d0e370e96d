//! Rekey policy engine.
//!
//! [`decide`] is the pure decision function driven by the rekey job: given
//! the owning session's state, the tunnel's resolved policy, and a usage
//! snapshot, it yields rekey-or-skip. It touches no locks and no clocks, so
//! it is testable independently of the scheduler and the SA store.
//!
//! # Decision rules
//!
//! 1. A passive session never rekeys, regardless of policy.
//! 2. `OnDemand` rekeys only if any traffic was processed since the last
//!    reset; an idle tunnel is left alone rather than burning a negotiation.
//! 3. `Never` never rekeys.
//! 4. `Always` rekeys unconditionally. Unrecognized policy values fall
//!    through to rekeying as well, keeping the permissive default of prior
//!    deployments.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ChildConfig;
use crate::sa::SaState;
use crate::usage::UsageSnapshot;

/// When a tunnel-level SA should be rekeyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RekeyPolicy {
    /// Rekey on every trigger.
    #[default]
    Always,
    /// Rekey only if the tunnel carried traffic since the last rekey.
    OnDemand,
    /// Never rekey; let the SA expire on its hard lifetime.
    Never,
}

/// Outcome of the rekey decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RekeyDecision {
    /// Begin a rekey negotiation for the tunnel.
    Rekey,
    /// Leave the tunnel alone.
    Skip(SkipReason),
}

/// Why a rekey trigger resulted in no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The owning session is a passive placeholder.
    PassiveSession,
    /// Policy is on-demand and the tunnel carried no traffic.
    IdleTunnel,
    /// Policy forbids rekeying.
    PolicyNever,
}

impl SkipReason {
    /// Stable string form used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PassiveSession => "passive_session",
            Self::IdleTunnel => "idle_tunnel",
            Self::PolicyNever => "policy_never",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether a tunnel should be rekeyed.
///
/// Pure function of (session state, policy, usage snapshot); the caller is
/// responsible for logging the outcome and acting on it.
#[must_use]
pub fn decide(
    session_state: SaState,
    policy: RekeyPolicy,
    usage: UsageSnapshot,
) -> RekeyDecision {
    if session_state.is_passive() {
        return RekeyDecision::Skip(SkipReason::PassiveSession);
    }
    match policy {
        RekeyPolicy::OnDemand if usage.is_idle() => RekeyDecision::Skip(SkipReason::IdleTunnel),
        RekeyPolicy::Never => RekeyDecision::Skip(SkipReason::PolicyNever),
        // Always, OnDemand with traffic, and any future policy value.
        _ => RekeyDecision::Rekey,
    }
}

/// Compute the delay until the next rekey trigger for a tunnel.
///
/// Subtracts a uniform random jitter in `[0, rekey_jitter]` from the soft
/// lifetime so SAs negotiated in the same exchange do not all rekey at the
/// same instant.
pub fn rekey_time<R: Rng + ?Sized>(config: &ChildConfig, rng: &mut R) -> Duration {
    let jitter_ms = u64::try_from(config.rekey_jitter.as_millis()).unwrap_or(u64::MAX);
    let jitter = Duration::from_millis(rng.gen_range(0..=jitter_ms));
    config.soft_lifetime.saturating_sub(jitter)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn usage(bytes: u64, packets: u64) -> UsageSnapshot {
        UsageSnapshot { bytes, packets }
    }

    #[test]
    fn test_established_always_rekeys_when_idle() {
        assert_eq!(
            decide(SaState::Established, RekeyPolicy::Always, usage(0, 0)),
            RekeyDecision::Rekey
        );
    }

    #[test]
    fn test_established_on_demand_skips_idle_tunnel() {
        assert_eq!(
            decide(SaState::Established, RekeyPolicy::OnDemand, usage(0, 0)),
            RekeyDecision::Skip(SkipReason::IdleTunnel)
        );
    }

    #[test]
    fn test_established_on_demand_rekeys_with_traffic() {
        assert_eq!(
            decide(SaState::Established, RekeyPolicy::OnDemand, usage(100, 0)),
            RekeyDecision::Rekey
        );
        assert_eq!(
            decide(SaState::Established, RekeyPolicy::OnDemand, usage(0, 3)),
            RekeyDecision::Rekey
        );
    }

    #[test]
    fn test_established_never_skips_despite_traffic() {
        assert_eq!(
            decide(SaState::Established, RekeyPolicy::Never, usage(1000, 50)),
            RekeyDecision::Skip(SkipReason::PolicyNever)
        );
    }

    #[test]
    fn test_passive_session_skips_despite_always() {
        assert_eq!(
            decide(SaState::Passive, RekeyPolicy::Always, usage(1000, 50)),
            RekeyDecision::Skip(SkipReason::PassiveSession)
        );
    }

    #[test]
    fn test_rekey_time_with_zero_jitter_is_soft_lifetime() {
        let config = ChildConfig {
            rekey_jitter: Duration::ZERO,
            ..ChildConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rekey_time(&config, &mut rng), config.soft_lifetime);
    }

    proptest! {
        #[test]
        fn prop_on_demand_rekeys_iff_traffic(bytes in 0u64..1_000_000, packets in 0u64..1_000_000) {
            let decision = decide(SaState::Established, RekeyPolicy::OnDemand, usage(bytes, packets));
            if bytes == 0 && packets == 0 {
                prop_assert_eq!(decision, RekeyDecision::Skip(SkipReason::IdleTunnel));
            } else {
                prop_assert_eq!(decision, RekeyDecision::Rekey);
            }
        }

        #[test]
        fn prop_passive_always_wins(bytes in 0u64..1_000_000, packets in 0u64..1_000_000) {
            for policy in [RekeyPolicy::Always, RekeyPolicy::OnDemand, RekeyPolicy::Never] {
                prop_assert_eq!(
                    decide(SaState::Passive, policy, usage(bytes, packets)),
                    RekeyDecision::Skip(SkipReason::PassiveSession)
                );
            }
        }

        #[test]
        fn prop_rekey_time_within_jitter_window(seed in any::<u64>(), jitter_secs in 0u64..600) {
            let config = ChildConfig {
                rekey_jitter: Duration::from_secs(jitter_secs),
                ..ChildConfig::default()
            };
            let mut rng = StdRng::seed_from_u64(seed);
            let delay = rekey_time(&config, &mut rng);
            prop_assert!(delay <= config.soft_lifetime);
            prop_assert!(delay >= config.soft_lifetime.saturating_sub(config.rekey_jitter));
        }
    }
}
