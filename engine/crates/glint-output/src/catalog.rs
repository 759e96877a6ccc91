//! Sink catalog - builds the enabled output sinks by name

use crate::console::ConsoleSink;
use crate::json::JsonLinesSink;
use crate::text::TextFileSink;
use glint_common::config::OutputConfig;
use glint_core::{Error, OutputSink, Result};

/// Known output sink names
pub struct SinkCatalog;

impl SinkCatalog {
    pub const NAMES: [&'static str; 3] = ["console", "text", "json"];

    /// Build one sink by name
    pub fn create(name: &str, config: &OutputConfig) -> Result<Box<dyn OutputSink>> {
        match name {
            "console" => Ok(Box::new(ConsoleSink::stdout())),
            "text" => Ok(Box::new(TextFileSink::new(&config.text_path))),
            "json" => Ok(Box::new(JsonLinesSink::new(&config.json_path))),
            other => Err(Error::Configuration(format!(
                "unknown output sink '{}' (available: {})",
                other,
                Self::NAMES.join(", ")
            ))),
        }
    }

    /// Build sinks in the given order, ignoring repeated names
    pub fn build<S: AsRef<str>>(names: &[S], config: &OutputConfig) -> Result<Vec<Box<dyn OutputSink>>> {
        let mut seen = Vec::new();
        let mut sinks = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            sinks.push(Self::create(name, config)?);
        }
        Ok(sinks)
    }
}
