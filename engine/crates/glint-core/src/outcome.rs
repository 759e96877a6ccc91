//! Check outcomes - the record produced by every check execution

use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of the message attached to outcomes synthesized from a failed check
pub const WORK_ERROR_PREFIX: &str = "work error: ";

/// Result of running one check against one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Status code
    pub status: Status,

    /// Human-readable message
    #[serde(default)]
    pub msg: String,

    /// URL the outcome refers to (may be empty)
    #[serde(default)]
    pub url: String,

    /// Additional key/value evidence
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl CheckOutcome {
    /// Create an outcome with the given status and message
    pub fn new(status: Status, msg: impl Into<String>) -> Self {
        Self {
            status,
            msg: msg.into(),
            url: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn vulnerable(msg: impl Into<String>) -> Self {
        Self::new(Status::Vulnerable, msg)
    }

    pub fn not_vulnerable(msg: impl Into<String>) -> Self {
        Self::new(Status::NotVulnerable, msg)
    }

    /// Outcome recorded when a check raised instead of returning
    pub fn work_error(err: impl std::fmt::Display) -> Self {
        Self::new(Status::Error, format!("{}{}", WORK_ERROR_PREFIX, err))
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether this outcome was synthesized from a check failure
    pub fn is_work_error(&self) -> bool {
        self.status == Status::Error && self.msg.starts_with(WORK_ERROR_PREFIX)
    }
}
