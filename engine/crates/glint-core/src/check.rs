//! Check trait and metadata - the interface all checks implement

use crate::error::Result;
use crate::outcome::CheckOutcome;
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// The trait that every check instance implements.
///
/// Instances are shared across worker threads, so any per-instance state
/// needs interior mutability.
pub trait Check: Send + Sync {
    /// Logical name of this instance (e.g., "web/git-config")
    fn name(&self) -> &str;

    /// Get the check metadata
    fn metadata(&self) -> &CheckMetadata;

    /// Evaluate the target.
    ///
    /// An `Err` is contained by the worker pool and recorded as an error outcome.
    fn check(&self, target: &Target) -> Result<CheckOutcome>;
}

/// Descriptive information about a check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckMetadata {
    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Vulnerability type (e.g., "info-leak", "rce")
    #[serde(default, rename = "type")]
    pub kind: String,

    /// Check author
    #[serde(default)]
    pub author: Option<String>,

    /// Check version
    #[serde(default)]
    pub version: Option<String>,

    /// Tags for filtering/grouping
    #[serde(default)]
    pub tags: Vec<String>,

    /// Reference URLs
    #[serde(default)]
    pub references: Vec<String>,
}

impl CheckMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }

    /// Case-insensitive substring match against type and tags
    pub fn matches_type(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.kind.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}
