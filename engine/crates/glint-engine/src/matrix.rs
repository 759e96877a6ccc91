//! Task matrix - the target × check cross-product

use glint_core::{Check, Target};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One (target, check) pair to execute
#[derive(Clone)]
pub struct Task {
    pub target: Target,
    pub check: Arc<dyn Check>,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("target", &self.target)
            .field("check", &self.check.name())
            .finish()
    }
}

/// FIFO queue shared by all workers.
///
/// `pop` is a single atomic step, so a worker never sees a task that another
/// worker already took.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks.into_iter().collect()),
        }
    }

    /// Take the next task, or `None` once the queue is drained
    pub fn pop(&self) -> Option<Task> {
        // A poisoned lock only means another worker panicked outside a check;
        // the queue itself is still consistent.
        let mut tasks = match self.tasks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        match self.tasks.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder for the task queue of a run
pub struct TaskMatrix;

impl TaskMatrix {
    /// One task per (target, check), targets in the outer loop
    pub fn build(targets: &[Target], checks: &[Arc<dyn Check>]) -> Vec<Task> {
        targets
            .iter()
            .flat_map(|target| {
                checks.iter().map(move |check| Task {
                    target: target.clone(),
                    check: Arc::clone(check),
                })
            })
            .collect()
    }
}
