//! Engine - one run of every registered check against every target

use crate::collector::Collector;
use crate::dispatch::OutputDispatcher;
use crate::matrix::{TaskMatrix, TaskQueue};
use crate::pool::WorkerPool;
use crate::progress::Progress;
use crate::results::{Completion, ResultsTable, RunReport, RunStats};
use glint_checks::CheckRegistry;
use glint_core::{dedup_targets, Result, Target};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Options for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Worker threads; clamped to the number of tasks
    pub threads: usize,
    /// Overall wall-clock budget for the run
    pub timeout: Duration,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            threads: 10,
            timeout: Duration::from_secs(300),
            show_progress: false,
        }
    }
}

/// Check runner over a frozen registry and a fixed target list
pub struct Engine {
    registry: Arc<CheckRegistry>,
    targets: Vec<Target>,
    dispatcher: OutputDispatcher,
}

impl Engine {
    /// Create an engine. Duplicate targets are dropped, first occurrence wins.
    pub fn new(registry: Arc<CheckRegistry>, targets: Vec<Target>, dispatcher: OutputDispatcher) -> Self {
        Self {
            registry,
            targets: dedup_targets(targets),
            dispatcher,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Run with the full sink lifecycle: construct, start, destruct.
    ///
    /// Sinks are destructed even when construction or the run fails; the
    /// first error wins.
    pub fn run(&mut self, options: &RunOptions) -> Result<RunReport> {
        let outcome = self
            .dispatcher
            .construct_all()
            .and_then(|()| self.start(options));
        let closed = self.dispatcher.destruct_all();
        let report = outcome?;
        closed?;
        Ok(report)
    }

    /// Execute the task matrix and collect every result
    pub fn start(&mut self, options: &RunOptions) -> Result<RunReport> {
        let started = Instant::now();
        let deadline = started + options.timeout;

        let checks = self.registry.instances();
        let tasks = TaskMatrix::build(&self.targets, &checks);
        let total = tasks.len();
        info!(
            "Running {} check(s) against {} target(s): {} task(s)",
            checks.len(),
            self.targets.len(),
            total
        );

        if total == 0 {
            return Ok(RunReport {
                results: ResultsTable::new(&self.targets),
                completion: Completion::Finished,
                stats: RunStats::new(0),
            });
        }

        let threads = options.threads.clamp(1, total);
        let queue = Arc::new(TaskQueue::new(tasks));
        let (sender, receiver) = mpsc::channel();
        let pool = WorkerPool::spawn(threads, queue, sender)?;
        debug!("Worker pool size: {}", pool.size());

        let progress = Progress::new(total, options.show_progress);
        let mut collector = Collector::new(&self.targets, total, deadline);
        let collected = collector.collect(&receiver, &mut self.dispatcher, &progress);

        let completion = match collected {
            Ok(Completion::Finished) => {
                progress.finish("complete");
                pool.join();
                Completion::Finished
            }
            Ok(completion) => {
                progress.abandon("deadline reached");
                pool.detach();
                completion
            }
            Err(e) => {
                progress.abandon("aborted");
                pool.detach();
                return Err(e);
            }
        };

        let (results, mut stats) = collector.into_parts();
        stats.set_elapsed(started.elapsed());
        info!(
            "Run finished in {} ms: {} vulnerable, {} not vulnerable, {} error(s)",
            stats.elapsed_ms, stats.vulnerable, stats.not_vulnerable, stats.errors
        );

        Ok(RunReport {
            results,
            completion,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingCheck, FixedCheck, RecordingSink, SinkEvent, SlowCheck};
    use glint_core::{Check, Status};
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    fn targets(names: &[&str]) -> Vec<Target> {
        names.iter().map(|n| Target::parse(n).unwrap()).collect()
    }

    fn registry(checks: Vec<Arc<dyn Check>>) -> Arc<CheckRegistry> {
        let mut registry = CheckRegistry::new();
        for check in checks {
            let name = check.name().to_string();
            registry.register(name, vec![check]).unwrap();
        }
        Arc::new(registry)
    }

    fn options(threads: usize) -> RunOptions {
        RunOptions {
            threads,
            timeout: Duration::from_secs(30),
            show_progress: false,
        }
    }

    #[test]
    fn test_scenario_mixed_statuses() {
        let registry = registry(vec![
            Arc::new(FixedCheck::new("web/vuln", Status::Vulnerable)),
            Arc::new(FixedCheck::new("web/clean", Status::NotVulnerable)),
            Arc::new(FailingCheck::erroring("web/broken")),
        ]);
        let mut engine = Engine::new(registry, targets(&["a.test", "b.test"]), OutputDispatcher::new());

        let report = engine.start(&options(2)).unwrap();
        assert_eq!(report.completion, Completion::Finished);
        assert_eq!(report.results.len(), 2);

        for row in report.results.rows() {
            assert_eq!(row.len(), 3);
            let statuses: BTreeSet<i8> = row.results.iter().map(|e| e.outcome.status.code()).collect();
            assert_eq!(statuses, BTreeSet::from([-1, 0, 1]));
        }
        assert_eq!(report.stats.completed, 6);
    }

    #[test]
    fn test_scenario_no_checks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = OutputDispatcher::with_sinks(vec![Box::new(RecordingSink::new("rec", Arc::clone(&log)))]);
        let mut engine = Engine::new(Arc::new(CheckRegistry::new()), targets(&["a.test"]), dispatcher);

        let report = engine.start(&options(4)).unwrap();
        assert_eq!(report.completion, Completion::Finished);
        assert_eq!(report.results.outcome_count(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failing_check_is_isolated() {
        let registry = registry(vec![
            Arc::new(FailingCheck::panicking("web/panic")),
            Arc::new(FixedCheck::new("web/ok", Status::NotVulnerable)),
        ]);
        let mut engine = Engine::new(registry, targets(&["a.test", "b.test", "c.test"]), OutputDispatcher::new());

        let report = engine.start(&options(3)).unwrap();
        for row in report.results.rows() {
            let failed = row.get("web/panic").unwrap();
            assert_eq!(failed.status, Status::Error);
            assert!(failed.msg.contains("work error"));
            assert_eq!(row.get("web/ok").unwrap().status, Status::NotVulnerable);
        }
    }

    #[test]
    fn test_every_pair_covered() {
        let checks: Vec<Arc<dyn Check>> = (0..4)
            .map(|i| Arc::new(FixedCheck::new(&format!("c{}", i), Status::NotVulnerable)) as Arc<dyn Check>)
            .collect();
        let names: Vec<String> = (0..7).map(|i| format!("t{}.test", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut engine = Engine::new(registry(checks), targets(&refs), OutputDispatcher::new());

        let report = engine.start(&options(16)).unwrap();
        assert_eq!(report.stats.total_tasks, 28);
        assert_eq!(report.results.outcome_count(), 28);
        assert!(report.results.rows().iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_duplicate_targets_run_once() {
        let registry = registry(vec![Arc::new(FixedCheck::new("web/x", Status::Vulnerable))]);
        let mut engine = Engine::new(registry, targets(&["a.test", "b.test", "a.test"]), OutputDispatcher::new());
        assert_eq!(engine.targets().len(), 2);

        let report = engine.start(&options(2)).unwrap();
        assert_eq!(report.results.outcome_count(), 2);
    }

    #[test]
    fn test_each_outcome_dispatched_once_per_sink() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = OutputDispatcher::with_sinks(vec![
            Box::new(RecordingSink::new("first", Arc::clone(&log))),
            Box::new(RecordingSink::new("second", Arc::clone(&log))),
        ]);
        let registry = registry(vec![
            Arc::new(FixedCheck::new("web/a", Status::Vulnerable)),
            Arc::new(FailingCheck::erroring("web/b")),
        ]);
        let mut engine = Engine::new(registry, targets(&["a.test", "b.test"]), dispatcher);

        engine.run(&options(2)).unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(events.first(), Some(&SinkEvent::Construct("first".into())));
        assert_eq!(events.last(), Some(&SinkEvent::Destruct("second".into())));

        let handled: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Handle(sink, target, check) => Some((sink.clone(), target.clone(), check.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(handled.len(), 8);
        // "second" always directly follows "first" for the same outcome
        for pair in handled.chunks(2) {
            assert_eq!(pair[0].0, "first");
            assert_eq!(pair[1].0, "second");
            assert_eq!((&pair[0].1, &pair[0].2), (&pair[1].1, &pair[1].2));
        }
    }

    #[test]
    fn test_sink_error_aborts_run_but_destructs() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = OutputDispatcher::with_sinks(vec![Box::new(RecordingSink::failing("broken", Arc::clone(&log)))]);
        let registry = registry(vec![Arc::new(FixedCheck::new("web/a", Status::Vulnerable))]);
        let mut engine = Engine::new(registry, targets(&["a.test", "b.test"]), dispatcher);

        let err = engine.run(&options(1)).unwrap_err();
        assert_eq!(err.code(), "OUTPUT_ERROR");
        assert_eq!(log.lock().unwrap().last(), Some(&SinkEvent::Destruct("broken".into())));
    }

    #[test]
    fn test_deadline_ends_run() {
        let registry = registry(vec![
            Arc::new(FixedCheck::new("web/fast", Status::NotVulnerable)),
            Arc::new(SlowCheck::new("web/slow", Duration::from_secs(5))),
        ]);
        let mut engine = Engine::new(registry, targets(&["a.test"]), OutputDispatcher::new());

        let report = engine
            .start(&RunOptions {
                threads: 2,
                timeout: Duration::from_millis(300),
                show_progress: false,
            })
            .unwrap();

        assert_eq!(report.completion, Completion::DeadlineExceeded { pending: 1 });
        assert!(report.results.get(&Target::parse("a.test").unwrap(), "web/fast").is_some());
        assert!(report.results.get(&Target::parse("a.test").unwrap(), "web/slow").is_none());
        assert!(report.stats.elapsed_ms < 5000);
    }
}
