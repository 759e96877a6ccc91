//! Check registry - verified check instances keyed by logical name

use glint_core::{Check, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of check instances.
///
/// Each logical name (e.g. "web/git-config") maps to the ordered instances its
/// module yielded. Names keep their registration order.
#[derive(Default)]
pub struct CheckRegistry {
    order: Vec<String>,
    checks: HashMap<String, Vec<Arc<dyn Check>>>,
}

impl CheckRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the instances a module yielded under its logical name.
    ///
    /// A name can be registered once; instance names must not repeat.
    pub fn register(&mut self, name: impl Into<String>, instances: Vec<Arc<dyn Check>>) -> Result<()> {
        let name = name.into();
        if self.checks.contains_key(&name) {
            return Err(Error::Load {
                locator: name,
                message: "check name already registered".to_string(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = instances.iter().find(|c| !seen.insert(c.name().to_string())) {
            return Err(Error::Load {
                locator: name,
                message: format!("duplicate check instance name: {}", dup.name()),
            });
        }
        self.order.push(name.clone());
        self.checks.insert(name, instances);
        Ok(())
    }

    /// Get the instances registered under a name
    pub fn get(&self, name: &str) -> Option<&[Arc<dyn Check>]> {
        self.checks.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Logical names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Every instance, flattened in registration order
    pub fn instances(&self) -> Vec<Arc<dyn Check>> {
        self.order
            .iter()
            .filter_map(|name| self.checks.get(name))
            .flatten()
            .cloned()
            .collect()
    }

    /// Number of logical names
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Number of instances across all names
    pub fn instance_count(&self) -> usize {
        self.checks.values().map(Vec::len).sum()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names whose metadata type or tags contain `needle`
    pub fn search_type(&self, needle: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| {
                self.checks[name.as_str()]
                    .iter()
                    .any(|c| c.metadata().matches_type(needle))
            })
            .map(|s| s.as_str())
            .collect()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.order.iter().map(|n| (n, self.checks[n].len())))
            .finish()
    }
}
