//! Worker pool draining the job queue.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use super::jobs::{Job, Requeue};
use super::queue::JobQueue;
use crate::context::JobContext;

/// Shared between the processor handle and its workers.
struct Shared {
    ctx: Arc<JobContext>,
    queue: Mutex<JobQueue>,
    available: Condvar,
    /// Cleared at shutdown; submissions and requeues are dropped once clear.
    accepting: AtomicBool,
}

/// Priority-ordered job scheduler over a fixed pool of worker threads.
///
/// # Contracts
///
/// - Strict priority across bands, FIFO within a band.
/// - A job execution that returns an error or panics is logged once and
///   dropped; the worker keeps running.
/// - [`Processor::shutdown`] drops queued-but-unstarted jobs without
///   executing them, lets in-flight executions finish, and joins every
///   worker. Dropping the processor does the same.
pub struct Processor {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl Processor {
    /// Spawn `workers` worker threads pulling from a fresh queue.
    pub fn spawn(workers: usize, ctx: Arc<JobContext>) -> io::Result<Self> {
        let shared = Arc::new(Shared {
            ctx,
            queue: Mutex::new(JobQueue::new()),
            available: Condvar::new(),
            accepting: AtomicBool::new(true),
        });

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("ikd-worker-{i}"))
                .spawn(move || worker_loop(&shared))?;
            handles.push(handle);
        }
        info!(workers, "processor started");

        Ok(Self {
            shared,
            workers: handles,
        })
    }

    /// Queue a job for execution.
    ///
    /// Thread-safe; callable from workers and external triggers alike. Jobs
    /// submitted after shutdown began are dropped.
    pub fn submit(&self, job: Job) {
        if !self.shared.accepting.load(Ordering::Acquire) {
            debug!(job = job.kind(), "processor shutting down, dropping job");
            return;
        }
        self.shared.queue.lock().push_back(job);
        self.shared.available.notify_one();
    }

    /// Number of jobs currently queued (not executing).
    #[must_use]
    pub fn queued(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Stop intake, drop unexecuted jobs, and join all workers.
    ///
    /// In-flight executions run to completion.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shared.accepting.store(false, Ordering::Release);
        let dropped = self.shared.queue.lock().drain();
        self.shared.available.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("worker thread panicked");
            }
        }
        info!(dropped, "processor stopped");
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let mut job = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(job) = queue.pop() {
                    break job;
                }
                if !shared.accepting.load(Ordering::Acquire) {
                    return;
                }
                shared.available.wait(&mut queue);
            }
        };

        let kind = job.kind();
        let result = panic::catch_unwind(AssertUnwindSafe(|| job.execute(&shared.ctx)));
        match result {
            Ok(Ok(Requeue::None)) => {},
            Ok(Ok(Requeue::Fair)) => reinsert(shared, job, false),
            Ok(Ok(Requeue::Direct)) => reinsert(shared, job, true),
            Ok(Err(err)) => {
                warn!(job = kind, error = %err, "job failed, dropping");
            },
            Err(_) => {
                error!(job = kind, "job panicked, dropping");
            },
        }
    }
}

fn reinsert(shared: &Shared, job: Job, front: bool) {
    {
        // Re-checked under the queue lock: either the push lands before
        // shutdown's drain, or the cleared flag is visible here.
        let mut queue = shared.queue.lock();
        if !shared.accepting.load(Ordering::Acquire) {
            drop(queue);
            debug!(job = job.kind(), "processor shutting down, dropping requeued job");
            return;
        }
        if front {
            queue.push_front(job);
        } else {
            queue.push_back(job);
        }
    }
    shared.available.notify_one();
}
