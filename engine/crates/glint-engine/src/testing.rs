//! Check and sink doubles for engine tests

use glint_core::{Check, CheckMetadata, CheckOutcome, Error, OutputSink, Result, Status, Target};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Always returns the same status
pub struct FixedCheck {
    name: String,
    metadata: CheckMetadata,
    status: Status,
}

impl FixedCheck {
    pub fn new(name: &str, status: Status) -> Self {
        Self {
            name: name.to_string(),
            metadata: CheckMetadata::new(name),
            status,
        }
    }
}

impl Check for FixedCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn check(&self, target: &Target) -> Result<CheckOutcome> {
        Ok(CheckOutcome::new(self.status, self.status.as_str()).with_url(target.base_url()))
    }
}

/// Always fails, either with an error or a panic
pub struct FailingCheck {
    name: String,
    metadata: CheckMetadata,
    panics: bool,
}

impl FailingCheck {
    pub fn erroring(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: CheckMetadata::new(name),
            panics: false,
        }
    }

    pub fn panicking(name: &str) -> Self {
        Self {
            panics: true,
            ..Self::erroring(name)
        }
    }
}

impl Check for FailingCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn check(&self, _target: &Target) -> Result<CheckOutcome> {
        if self.panics {
            panic!("index out of range");
        }
        Err(Error::check_failed(&self.name, "connection reset"))
    }
}

/// Sleeps before answering
pub struct SlowCheck {
    name: String,
    metadata: CheckMetadata,
    delay: Duration,
}

impl SlowCheck {
    pub fn new(name: &str, delay: Duration) -> Self {
        Self {
            name: name.to_string(),
            metadata: CheckMetadata::new(name),
            delay,
        }
    }
}

impl Check for SlowCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn check(&self, _target: &Target) -> Result<CheckOutcome> {
        std::thread::sleep(self.delay);
        Ok(CheckOutcome::not_vulnerable("slow"))
    }
}

/// Event seen by a `RecordingSink`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Construct(String),
    Handle(String, String, String),
    Destruct(String),
}

/// Records every lifecycle call into a shared log
pub struct RecordingSink {
    name: String,
    log: Arc<Mutex<Vec<SinkEvent>>>,
    fail_on_handle: bool,
    handle_delay: Duration,
}

impl RecordingSink {
    pub fn new(name: &str, log: Arc<Mutex<Vec<SinkEvent>>>) -> Self {
        Self {
            name: name.to_string(),
            log,
            fail_on_handle: false,
            handle_delay: Duration::ZERO,
        }
    }

    pub fn failing(name: &str, log: Arc<Mutex<Vec<SinkEvent>>>) -> Self {
        Self {
            fail_on_handle: true,
            ..Self::new(name, log)
        }
    }

    /// Sleeps for `delay` inside every `handle` call
    pub fn slow(name: &str, log: Arc<Mutex<Vec<SinkEvent>>>, delay: Duration) -> Self {
        Self {
            handle_delay: delay,
            ..Self::new(name, log)
        }
    }
}

impl OutputSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn construct(&mut self) -> Result<()> {
        self.log.lock().unwrap().push(SinkEvent::Construct(self.name.clone()));
        Ok(())
    }

    fn handle(&mut self, target: &Target, check: &dyn Check, _outcome: &CheckOutcome) -> Result<()> {
        std::thread::sleep(self.handle_delay);
        self.log.lock().unwrap().push(SinkEvent::Handle(
            self.name.clone(),
            target.to_string(),
            check.name().to_string(),
        ));
        if self.fail_on_handle {
            return Err(Error::output(&self.name, "disk full"));
        }
        Ok(())
    }

    fn destruct(&mut self) -> Result<()> {
        self.log.lock().unwrap().push(SinkEvent::Destruct(self.name.clone()));
        Ok(())
    }
}
