//! Glint Core - Foundation types, traits, and error handling
//!
//! This crate provides the core abstractions shared by every Glint crate:
//! - `Target`: A resolved identifier a check runs against (URL, host, address)
//! - `CheckOutcome`: The `{status, msg, url, extra}` record a check produces
//! - `Check`: The trait that all checks implement
//! - `OutputSink`: The trait that all output sinks implement
//! - `Status`: The -1 / 0 / 1 status codes

pub mod check;
pub mod error;
pub mod outcome;
pub mod sink;
pub mod status;
pub mod target;

// Re-export commonly used types at crate root
pub use check::{Check, CheckMetadata};
pub use error::{Error, Result};
pub use outcome::{CheckOutcome, WORK_ERROR_PREFIX};
pub use sink::OutputSink;
pub use status::Status;
pub use target::{dedup_targets, Target, TargetKind};
