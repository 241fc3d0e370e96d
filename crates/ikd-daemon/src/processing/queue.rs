//! Priority-banded FIFO job queue.
//!
//! One `VecDeque` per priority band. Strict priority across bands, FIFO
//! within a band; `push_front` implements the direct-requeue directive.
//! Thread safety is the caller's concern (the processor wraps the queue in
//! its own mutex).

use std::collections::VecDeque;

use super::jobs::{Job, JobPriority};

pub(crate) struct JobQueue {
    bands: [VecDeque<Job>; JobPriority::COUNT],
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        Self {
            bands: std::array::from_fn(|_| VecDeque::new()),
        }
    }

    /// Insert at the back of the job's priority band.
    pub(crate) fn push_back(&mut self, job: Job) {
        self.bands[job.priority().band()].push_back(job);
    }

    /// Insert at the front of the job's priority band, ahead of queued peers.
    pub(crate) fn push_front(&mut self, job: Job) {
        self.bands[job.priority().band()].push_front(job);
    }

    /// Remove the highest-priority job, oldest first within a band.
    pub(crate) fn pop(&mut self) -> Option<Job> {
        self.bands.iter_mut().find_map(VecDeque::pop_front)
    }

    pub(crate) fn len(&self) -> usize {
        self.bands.iter().map(VecDeque::len).sum()
    }

    /// Discard all queued jobs, returning how many were dropped.
    pub(crate) fn drain(&mut self) -> usize {
        let dropped = self.len();
        for band in &mut self.bands {
            band.clear();
        }
        dropped
    }
}
