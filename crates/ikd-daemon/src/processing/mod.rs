//! Job processing engine.
//!
//! Deferred work enters as a [`jobs::Job`] via [`Processor::submit`], waits
//! in a strict-priority queue (FIFO within a band), and is executed by one of
//! a fixed pool of worker threads. The job's return value tells the
//! processor whether to drop it, reinsert it at the back of its band, or
//! reinsert it at the front for immediate continuation.

mod processor;
mod queue;

pub mod jobs;

pub use processor::Processor;
