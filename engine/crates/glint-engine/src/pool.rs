//! Worker pool - fixed-size threads draining the task queue

use crate::matrix::{Task, TaskQueue};
use glint_core::{Check, CheckOutcome, Error, Result, Target};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// Completion message sent by a worker for every task it attempted
pub struct TaskResult {
    pub target: Target,
    pub check: Arc<dyn Check>,
    pub outcome: CheckOutcome,
}

impl std::fmt::Debug for TaskResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskResult")
            .field("target", &self.target)
            .field("check", &self.check.name())
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// Running worker threads of one engine run
pub struct WorkerPool {
    handles: Vec<JoinHandle<usize>>,
    stop: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Spawn `threads` workers over a shared queue.
    ///
    /// Each worker sends exactly one `TaskResult` per task it pops and exits
    /// when the queue is drained, the stop flag is raised, or the receiver
    /// is gone.
    pub fn spawn(threads: usize, queue: Arc<TaskQueue>, results: Sender<TaskResult>) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(threads);

        for id in 0..threads {
            let queue = Arc::clone(&queue);
            let results = results.clone();
            let worker_stop = Arc::clone(&stop);
            let spawned = thread::Builder::new()
                .name(format!("glint-worker-{}", id))
                .spawn(move || worker_loop(id, &queue, &results, &worker_stop));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Workers already running see the flag and stop early
                    stop.store(true, Ordering::SeqCst);
                    return Err(Error::Internal(format!("failed to spawn worker {}: {}", id, e)));
                }
            }
        }

        debug!("Started {} workers", handles.len());
        Ok(Self { handles, stop })
    }

    /// Number of workers spawned
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Ask workers not to start any further task
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Wait for every worker, returning the number of tasks they attempted
    pub fn join(self) -> usize {
        let mut attempted = 0;
        for handle in self.handles {
            match handle.join() {
                Ok(count) => attempted += count,
                Err(_) => warn!("Worker thread terminated abnormally"),
            }
        }
        attempted
    }

    /// Stop the pool without waiting for tasks that are still running
    pub fn detach(self) {
        self.stop();
        debug!("Detaching {} workers", self.handles.len());
    }
}

fn worker_loop(id: usize, queue: &TaskQueue, results: &Sender<TaskResult>, stop: &AtomicBool) -> usize {
    let mut attempted = 0;
    while !stop.load(Ordering::SeqCst) {
        let Some(task) = queue.pop() else {
            break;
        };
        attempted += 1;
        trace!("worker {} running {} for {}", id, task.check.name(), task.target);

        let Task { target, check } = task;
        let outcome = run_check(check.as_ref(), &target);
        if results.send(TaskResult { target, check, outcome }).is_err() {
            // Collector has gone away
            break;
        }
    }
    attempted
}

/// Run one check, turning an error or panic into a `work error` outcome
pub fn run_check(check: &dyn Check, target: &Target) -> CheckOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| check.check(target))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => CheckOutcome::work_error(e),
        Err(payload) => CheckOutcome::work_error(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        String::from("panicked")
    }
}
