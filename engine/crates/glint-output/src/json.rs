//! JSON lines sink

use crate::text::create_output;
use chrono::{DateTime, Utc};
use glint_core::{Check, CheckOutcome, Error, OutputSink, Result, Target};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// One line of the JSON output
#[derive(Debug, Serialize)]
struct Record<'a> {
    timestamp: DateTime<Utc>,
    target: &'a Target,
    check: &'a str,
    #[serde(flatten)]
    outcome: &'a CheckOutcome,
}

/// Writes one JSON object per outcome
pub struct JsonLinesSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for JsonLinesSink {
    fn name(&self) -> &str {
        "json"
    }

    fn construct(&mut self) -> Result<()> {
        self.writer = Some(create_output("json", &self.path)?);
        Ok(())
    }

    fn handle(&mut self, target: &Target, check: &dyn Check, outcome: &CheckOutcome) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::output("json", "result file is not open"))?;
        let record = Record {
            timestamp: Utc::now(),
            target,
            check: check.name(),
            outcome,
        };
        serde_json::to_writer(&mut *writer, &record).map_err(|e| Error::output("json", e.to_string()))?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|e| Error::output("json", e.to_string()))
    }

    fn destruct(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| Error::output("json", e.to_string()))?;
            info!("Saved JSON results to {}", self.path.display());
        }
        Ok(())
    }
}
