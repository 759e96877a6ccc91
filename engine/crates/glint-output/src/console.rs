//! Console sink

use crate::format::{describe, marker};
use colored::*;
use glint_core::{Check, CheckOutcome, Error, OutputSink, Result, Status, Target};
use std::io::Write;

/// Prints one coloured line per outcome
pub struct ConsoleSink<W: Write + Send = std::io::Stdout> {
    out: W,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self { out: std::io::stdout() }
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> OutputSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn handle(&mut self, _target: &Target, check: &dyn Check, outcome: &CheckOutcome) -> Result<()> {
        let mark = marker(outcome);
        let mark = match outcome.status {
            Status::Vulnerable => mark.green().bold(),
            Status::NotVulnerable => mark.normal(),
            Status::Error => mark.red(),
        };
        writeln!(self.out, "{} {}", mark, describe(check.name(), outcome))
            .map_err(|e| Error::output("console", e.to_string()))
    }

    fn destruct(&mut self) -> Result<()> {
        self.out.flush().map_err(|e| Error::output("console", e.to_string()))
    }
}
