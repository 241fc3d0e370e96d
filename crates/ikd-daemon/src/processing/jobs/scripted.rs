//! Test-only job that replays a fixed requeue script.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{JobPriority, Requeue};

/// Records its id into a shared log on each execution and answers with the
/// next directive from its script (empty script means [`Requeue::None`]).
///
/// Used to drive the processor through requeue paths the shipped one-shot
/// variants never take. An optional gate blocks the first execution until
/// the test releases it, pinning jobs behind a busy worker.
#[derive(Debug)]
pub struct ScriptedJob {
    id: u32,
    priority: JobPriority,
    directives: VecDeque<Requeue>,
    runs: Arc<Mutex<Vec<u32>>>,
    gate: Option<mpsc::Receiver<()>>,
}

impl ScriptedJob {
    pub fn new(
        id: u32,
        priority: JobPriority,
        directives: Vec<Requeue>,
        runs: &Arc<Mutex<Vec<u32>>>,
    ) -> Self {
        Self {
            id,
            priority,
            directives: directives.into(),
            runs: Arc::clone(runs),
            gate: None,
        }
    }

    #[must_use]
    pub fn with_gate(mut self, gate: mpsc::Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(super) const fn priority(&self) -> JobPriority {
        self.priority
    }

    pub(super) fn execute(&mut self) -> Requeue {
        if let Some(gate) = self.gate.take() {
            let _ = gate.recv();
        }
        self.runs.lock().push(self.id);
        self.directives.pop_front().unwrap_or(Requeue::None)
    }
}
