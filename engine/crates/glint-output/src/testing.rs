//! Check double for sink tests

use glint_core::{Check, CheckMetadata, CheckOutcome, Result, Target};

pub struct NamedCheck {
    name: String,
    metadata: CheckMetadata,
}

impl NamedCheck {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: CheckMetadata::new(name),
        }
    }
}

impl Check for NamedCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn check(&self, _target: &Target) -> Result<CheckOutcome> {
        Ok(CheckOutcome::not_vulnerable(""))
    }
}
