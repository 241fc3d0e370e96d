//! ikd-daemon - Runtime core of the ikd keying daemon
//!
//! This crate provides the concurrency substrate the keying daemon runs on:
//! a priority-ordered job queue drained by a fixed pool of worker threads,
//! and a keyed SA store granting exclusive checkout of one session at a
//! time. Protocol policy (the rekey decision) lives in `ikd-core`; this
//! crate hosts the jobs that drive it.
//!
//! # Architecture
//!
//! ```text
//! trigger (timer / protocol event)
//!        |
//!        v  submit(job)
//! +-------------------+        +---------------------------+
//! |     Processor     |        |          SaStore          |
//! |  priority queue   |        |  child key -> session id  |
//! |  worker pool      |------->|  session id -> lock       |
//! +-------------------+ checkout_child / checkout          |
//!        |                     +---------------------------+
//!        v  rekey decision
//! Negotiation seam (exchange layer, external)
//! ```
//!
//! # Key Concepts
//!
//! - **Job**: a unit of deferred work owning its payload outright, executed
//!   at most once per dequeue; its return value tells the processor whether
//!   to drop or requeue it.
//! - **Checkout/checkin**: exclusive access to one session, released on
//!   drop of the returned handle. Lookup is tunnel-keyed, locking is
//!   session-keyed.
//! - **Fault isolation**: a failing or panicking job is logged and dropped;
//!   it never takes a worker thread down with it.

pub mod context;
pub mod negotiation;
pub mod processing;
pub mod sa_store;
