//! Result collector - single-threaded consumer of worker completions

use crate::dispatch::OutputDispatcher;
use crate::pool::TaskResult;
use crate::progress::Progress;
use crate::results::{Completion, ResultsTable, RunStats};
use glint_core::{Error, Result, Status, Target};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;
use tracing::{error, info, warn};

/// Consumes task results until every task reported or the deadline passes.
///
/// Owns the results table and counters; nothing else writes to them.
pub struct Collector {
    total: usize,
    deadline: Instant,
    results: ResultsTable,
    stats: RunStats,
}

impl Collector {
    pub fn new(targets: &[Target], total: usize, deadline: Instant) -> Self {
        Self {
            total,
            deadline,
            results: ResultsTable::new(targets),
            stats: RunStats::new(total),
        }
    }

    /// Number of tasks that reported back so far
    pub fn finished(&self) -> usize {
        self.stats.completed
    }

    /// Drain completions, storing and dispatching each one.
    ///
    /// Only real completions advance the count. A sink error stops collection
    /// and is returned as-is.
    pub fn collect(
        &mut self,
        receiver: &Receiver<TaskResult>,
        dispatcher: &mut OutputDispatcher,
        progress: &Progress,
    ) -> Result<Completion> {
        while self.finished() < self.total {
            let remaining = self.deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return self.drain_at_deadline(receiver, dispatcher, progress);
            }

            match receiver.recv_timeout(remaining) {
                Ok(result) => {
                    self.accept(result, dispatcher, progress)?;
                }
                Err(RecvTimeoutError::Timeout) => {
                    return self.drain_at_deadline(receiver, dispatcher, progress);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Error::Internal(format!(
                        "all workers exited with {} task(s) unaccounted for",
                        self.total - self.finished()
                    )));
                }
            }
        }
        Ok(Completion::Finished)
    }

    fn accept(&mut self, result: TaskResult, dispatcher: &mut OutputDispatcher, progress: &Progress) -> Result<()> {
        let TaskResult { target, check, outcome } = result;

        if outcome.status == Status::Vulnerable {
            info!(msg = %outcome.msg, "done check: {} for {}", check.name(), target);
        } else {
            error!(msg = %outcome.msg, "done check: {} for {}", check.name(), target);
        }

        self.stats.record(&outcome);
        progress.advance(check.name());
        self.results.insert(&target, check.name(), outcome.clone());
        progress.suspend(|| dispatcher.dispatch(&target, check.as_ref(), &outcome))
    }

    /// Accept whatever already arrived before declaring the deadline missed.
    ///
    /// Results queued while the collector was busy completed in time, so they
    /// are stored and dispatched rather than counted as pending.
    fn drain_at_deadline(
        &mut self,
        receiver: &Receiver<TaskResult>,
        dispatcher: &mut OutputDispatcher,
        progress: &Progress,
    ) -> Result<Completion> {
        while self.finished() < self.total {
            match receiver.try_recv() {
                Ok(result) => self.accept(result, dispatcher, progress)?,
                Err(_) => break,
            }
        }
        if self.finished() == self.total {
            return Ok(Completion::Finished);
        }
        Ok(self.deadline_exceeded())
    }

    fn deadline_exceeded(&self) -> Completion {
        let pending = self.total - self.finished();
        warn!(
            "Run deadline reached with {} of {} task(s) still pending",
            pending, self.total
        );
        Completion::DeadlineExceeded { pending }
    }

    /// Hand over the collected table and counters
    pub fn into_parts(self) -> (ResultsTable, RunStats) {
        (self.results, self.stats)
    }
}
