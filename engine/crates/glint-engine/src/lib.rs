//! Glint Engine - Runs every check against every target
//!
//! This crate provides:
//! - `TaskMatrix`: The target × check cross-product as a shared task queue
//! - `WorkerPool`: Fixed-size worker threads with per-task failure isolation
//! - `Collector`: Single-threaded result consumer bounded by an overall deadline
//! - `OutputDispatcher`: Ordered fan-out of outcomes to output sinks
//! - `Engine`: Ties the pieces together for one run

pub mod collector;
pub mod dispatch;
pub mod engine;
pub mod matrix;
pub mod pool;
pub mod progress;
pub mod results;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::Collector;
pub use dispatch::OutputDispatcher;
pub use engine::{Engine, RunOptions};
pub use matrix::{Task, TaskMatrix, TaskQueue};
pub use pool::{TaskResult, WorkerPool};
pub use results::{Completion, ResultRow, ResultsTable, RunReport, RunStats};
