//! Byte and packet usage accounting for tunnel-level SAs.
//!
//! The kernel-facing data path reports traffic totals per child SA; the rekey
//! policy engine only ever sees an immutable [`UsageSnapshot`] taken at
//! decision time.

/// Running usage counters owned by a child SA.
///
/// Mutated only while the owning session is checked out, so plain integers
/// suffice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageCounters {
    bytes: u64,
    packets: u64,
}

impl UsageCounters {
    /// Create zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: 0,
            packets: 0,
        }
    }

    /// Record traffic processed by the SA.
    pub fn record(&mut self, bytes: u64, packets: u64) {
        self.bytes = self.bytes.saturating_add(bytes);
        self.packets = self.packets.saturating_add(packets);
    }

    /// Take a point-in-time snapshot of the counters.
    #[must_use]
    pub const fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            bytes: self.bytes,
            packets: self.packets,
        }
    }

    /// Reset both counters to zero.
    ///
    /// Called after a rekey so the next on-demand decision reflects traffic
    /// since the last key change only.
    pub fn reset(&mut self) {
        self.bytes = 0;
        self.packets = 0;
    }
}

/// Point-in-time usage reading consumed by the rekey decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSnapshot {
    /// Bytes processed since the last reset.
    pub bytes: u64,
    /// Packets processed since the last reset.
    pub packets: u64,
}

impl UsageSnapshot {
    /// Snapshot with both counters zero.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            bytes: 0,
            packets: 0,
        }
    }

    /// True if no traffic has been processed since the last reset.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.bytes == 0 && self.packets == 0
    }
}
