//! Output dispatcher - ordered fan-out of outcomes to sinks

use glint_core::{Check, CheckOutcome, OutputSink, Result, Target};
use tracing::{debug, error};

/// Registered output sinks, invoked in registration order
#[derive(Default)]
pub struct OutputDispatcher {
    sinks: Vec<Box<dyn OutputSink>>,
}

impl OutputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sinks(sinks: Vec<Box<dyn OutputSink>>) -> Self {
        Self { sinks }
    }

    pub fn register(&mut self, sink: Box<dyn OutputSink>) {
        debug!("Registered output sink: {}", sink.name());
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Call `construct` on every sink; the first error stops here
    pub fn construct_all(&mut self) -> Result<()> {
        for sink in &mut self.sinks {
            sink.construct()?;
        }
        Ok(())
    }

    /// Hand one outcome to every sink. Sink errors are not contained.
    pub fn dispatch(&mut self, target: &Target, check: &dyn Check, outcome: &CheckOutcome) -> Result<()> {
        for sink in &mut self.sinks {
            sink.handle(target, check, outcome)?;
        }
        Ok(())
    }

    /// Call `destruct` on every sink, even after one fails; returns the first error
    pub fn destruct_all(&mut self) -> Result<()> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.destruct() {
                error!("Output sink {} failed to close: {}", sink.name(), e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for OutputDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputDispatcher")
            .field("sinks", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedCheck, RecordingSink, SinkEvent};
    use glint_core::Status;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = OutputDispatcher::new();
        dispatcher.register(Box::new(RecordingSink::new("first", Arc::clone(&log))));
        dispatcher.register(Box::new(RecordingSink::new("second", Arc::clone(&log))));
        assert_eq!(dispatcher.names(), vec!["first", "second"]);

        let target = Target::parse("a.test").unwrap();
        let check = FixedCheck::new("web/x", Status::Vulnerable);
        dispatcher
            .dispatch(&target, &check, &CheckOutcome::vulnerable("found"))
            .unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                SinkEvent::Handle("first".into(), "a.test".into(), "web/x".into()),
                SinkEvent::Handle("second".into(), "a.test".into(), "web/x".into()),
            ]
        );
    }

    #[test]
    fn test_handler_error_propagates() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = OutputDispatcher::with_sinks(vec![
            Box::new(RecordingSink::failing("broken", Arc::clone(&log))),
            Box::new(RecordingSink::new("after", Arc::clone(&log))),
        ]);

        let target = Target::parse("a.test").unwrap();
        let check = FixedCheck::new("web/x", Status::Vulnerable);
        let err = dispatcher
            .dispatch(&target, &check, &CheckOutcome::vulnerable("found"))
            .unwrap_err();
        assert_eq!(err.code(), "OUTPUT_ERROR");

        // The failing sink stops the fan-out
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_lifecycle_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = OutputDispatcher::with_sinks(vec![
            Box::new(RecordingSink::new("a", Arc::clone(&log))),
            Box::new(RecordingSink::new("b", Arc::clone(&log))),
        ]);
        dispatcher.construct_all().unwrap();
        dispatcher.destruct_all().unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                SinkEvent::Construct("a".into()),
                SinkEvent::Construct("b".into()),
                SinkEvent::Destruct("a".into()),
                SinkEvent::Destruct("b".into()),
            ]
        );
    }
}
