//! Output sink contract

use crate::check::Check;
use crate::error::Result;
use crate::outcome::CheckOutcome;
use crate::target::Target;

/// A consumer of check outcomes (console, result files, ...).
///
/// Sinks are driven from the collecting thread only. Errors returned from any
/// hook are not contained: they abort the run.
pub trait OutputSink: Send {
    /// Name used to select the sink (e.g., "console")
    fn name(&self) -> &str;

    /// Called once before the run starts
    fn construct(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once for every collected outcome
    fn handle(&mut self, target: &Target, check: &dyn Check, outcome: &CheckOutcome) -> Result<()>;

    /// Called once after the run ends, for cleanup and flushing
    fn destruct(&mut self) -> Result<()> {
        Ok(())
    }
}
