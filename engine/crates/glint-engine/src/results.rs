//! Results table and run report

use glint_core::{CheckOutcome, Status, Target};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Outcomes collected for one target, in arrival order
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub target: Target,
    pub results: Vec<CheckEntry>,
}

/// One check's outcome within a row
#[derive(Debug, Clone, Serialize)]
pub struct CheckEntry {
    pub check: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl ResultRow {
    fn new(target: Target) -> Self {
        Self {
            target,
            results: Vec::new(),
        }
    }

    /// Outcome of a check on this target, if it ran
    pub fn get(&self, check: &str) -> Option<&CheckOutcome> {
        self.results.iter().find(|e| e.check == check).map(|e| &e.outcome)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Target → (check → outcome).
///
/// Rows keep target order; only the collecting thread writes to it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResultsTable {
    rows: Vec<ResultRow>,
    #[serde(skip)]
    index: HashMap<Target, usize>,
}

impl ResultsTable {
    /// Create a table with one empty row per target
    pub fn new(targets: &[Target]) -> Self {
        let mut table = Self::default();
        for target in targets {
            table.row_index(target);
        }
        table
    }

    fn row_index(&mut self, target: &Target) -> usize {
        if let Some(&i) = self.index.get(target) {
            return i;
        }
        self.rows.push(ResultRow::new(target.clone()));
        let i = self.rows.len() - 1;
        self.index.insert(target.clone(), i);
        i
    }

    /// Store an outcome
    pub fn insert(&mut self, target: &Target, check: &str, outcome: CheckOutcome) {
        let i = self.row_index(target);
        self.rows[i].results.push(CheckEntry {
            check: check.to_string(),
            outcome,
        });
    }

    pub fn row(&self, target: &Target) -> Option<&ResultRow> {
        self.index.get(target).map(|&i| &self.rows[i])
    }

    pub fn get(&self, target: &Target, check: &str) -> Option<&CheckOutcome> {
        self.row(target).and_then(|row| row.get(check))
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of stored outcomes across all targets
    pub fn outcome_count(&self) -> usize {
        self.rows.iter().map(ResultRow::len).sum()
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Completion {
    /// Every task reported back
    Finished,
    /// The overall deadline passed with tasks still outstanding
    DeadlineExceeded { pending: usize },
}

impl Completion {
    pub fn is_finished(&self) -> bool {
        matches!(self, Completion::Finished)
    }
}

/// Counters for a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub total_tasks: usize,
    pub completed: usize,
    pub vulnerable: usize,
    pub not_vulnerable: usize,
    pub errors: usize,
    pub elapsed_ms: u64,
}

impl RunStats {
    pub fn new(total_tasks: usize) -> Self {
        Self {
            total_tasks,
            ..Default::default()
        }
    }

    /// Count one collected outcome
    pub fn record(&mut self, outcome: &CheckOutcome) {
        self.completed += 1;
        match outcome.status {
            Status::Vulnerable => self.vulnerable += 1,
            Status::NotVulnerable => self.not_vulnerable += 1,
            Status::Error => self.errors += 1,
        }
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_millis() as u64;
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub results: ResultsTable,
    pub completion: Completion,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(s: &str) -> Target {
        Target::parse(s).unwrap()
    }

    #[test]
    fn test_table_keeps_every_target() {
        let table = ResultsTable::new(&[target("b.test"), target("a.test")]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].target.as_str(), "b.test");
        assert!(table.rows().iter().all(ResultRow::is_empty));
        assert_eq!(table.outcome_count(), 0);
    }

    #[test]
    fn test_insert_and_lookup() {
        let t = target("a.test");
        let mut table = ResultsTable::new(&[t.clone()]);
        table.insert(&t, "web/x", CheckOutcome::vulnerable("found"));
        table.insert(&t, "web/y", CheckOutcome::not_vulnerable("clean"));

        assert_eq!(table.get(&t, "web/x").unwrap().status, Status::Vulnerable);
        assert_eq!(table.row(&t).unwrap().len(), 2);
        assert!(table.get(&t, "web/z").is_none());

        // Unknown targets get a row of their own
        table.insert(&target("c.test"), "web/x", CheckOutcome::work_error("boom"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.outcome_count(), 3);
    }

    #[test]
    fn test_table_serializes_as_rows() {
        let t = target("a.test");
        let mut table = ResultsTable::new(&[t.clone()]);
        table.insert(&t, "web/x", CheckOutcome::vulnerable("found").with_url("http://a.test/"));

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["target"], "a.test");
        assert_eq!(json[0]["results"][0]["check"], "web/x");
        assert_eq!(json[0]["results"][0]["status"], 0);
        assert_eq!(json[0]["results"][0]["url"], "http://a.test/");
    }

    #[test]
    fn test_stats_record() {
        let mut stats = RunStats::new(3);
        stats.record(&CheckOutcome::vulnerable("a"));
        stats.record(&CheckOutcome::not_vulnerable("b"));
        stats.record(&CheckOutcome::work_error("c"));
        assert_eq!(stats.completed, 3);
        assert_eq!((stats.vulnerable, stats.not_vulnerable, stats.errors), (1, 1, 1));
    }

    #[test]
    fn test_completion_serialization() {
        let json = serde_json::to_value(Completion::DeadlineExceeded { pending: 4 }).unwrap();
        assert_eq!(json["state"], "deadline_exceeded");
        assert_eq!(json["pending"], 4);
    }
}
