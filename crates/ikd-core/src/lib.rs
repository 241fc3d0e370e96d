//! ikd-core - Domain model for the ikd keying daemon
//!
//! This crate holds the thread-free domain logic shared by the daemon
//! runtime: Security Association (SA) identity and state machine, per-tunnel
//! usage accounting, resolved configuration types, and the rekey policy
//! engine.
//!
//! Nothing in this crate blocks or spawns threads. The concurrency substrate
//! (job queue, worker pool, SA store) lives in `ikd-daemon` and consumes
//! these types.
//!
//! # Modules
//!
//! - [`config`]: resolved daemon and per-child configuration values
//! - [`rekey`]: rekey policy, the pure rekey decision function, and the
//!   randomized rekey-time helper
//! - [`sa`]: session-level and tunnel-level SA model, identity keys, and the
//!   SA state machine
//! - [`usage`]: byte/packet usage counters and snapshots

pub mod config;
pub mod rekey;
pub mod sa;
pub mod usage;
