//! Glint Output - Output sinks for check outcomes
//!
//! This crate provides:
//! - `ConsoleSink`: Coloured one-line summaries on stdout
//! - `TextFileSink`: The same lines appended to a result file
//! - `JsonLinesSink`: One JSON document per outcome
//! - `SinkCatalog`: Builds the enabled sinks from configuration

pub mod catalog;
pub mod console;
pub mod format;
pub mod json;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::SinkCatalog;
pub use console::ConsoleSink;
pub use json::JsonLinesSink;
pub use text::TextFileSink;
