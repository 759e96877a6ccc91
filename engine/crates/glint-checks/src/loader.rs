//! Module loader - turns check source text into named, loaded modules

use crate::definition::ModuleDefinition;
use glint_common::digest::{module_identity, sha256_hex};
use glint_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Scheme of the synthetic paths modules are addressed by in diagnostics
pub const MODULE_SCHEME: &str = "glint";

/// A loaded (parsed, not yet verified) check module
#[derive(Debug)]
pub struct CheckModule {
    identity: String,
    path: String,
    digest: String,
    definition: ModuleDefinition,
}

impl CheckModule {
    /// Explicit name, or `pocs_<digest>` when loaded anonymously
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Synthetic `glint://<identity>` path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// SHA-256 of the source text, hex encoded
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn definition(&self) -> &ModuleDefinition {
        &self.definition
    }
}

/// Result of a load request
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub module: Arc<CheckModule>,
    /// False when the identical module was already loaded during this run
    pub fresh: bool,
}

/// Loads modules and caches them by identity for the lifetime of a run
#[derive(Debug, Default)]
pub struct ModuleLoader {
    modules: HashMap<String, Arc<CheckModule>>,
}

impl ModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load source text under an optional explicit name.
    ///
    /// Reloading the same identity with the same source is a no-op that
    /// returns the cached module. Reusing an identity for different source
    /// is a load error.
    pub fn load(&mut self, source: &str, name: Option<&str>) -> Result<LoadedModule> {
        if source.trim().is_empty() {
            return Err(Error::Load {
                locator: name.unwrap_or("<inline>").to_string(),
                message: "parse data error / no data".into(),
            });
        }

        let digest = sha256_hex(source.as_bytes());
        let identity = match name {
            Some(name) => name.to_string(),
            None => module_identity(source),
        };

        if let Some(existing) = self.modules.get(&identity) {
            if existing.digest == digest {
                debug!("Reusing loaded module {}", identity);
                return Ok(LoadedModule {
                    module: Arc::clone(existing),
                    fresh: false,
                });
            }
            return Err(Error::Load {
                locator: identity,
                message: "identity already loaded from different source".into(),
            });
        }

        let path = format!("{}://{}", MODULE_SCHEME, identity);
        let definition: ModuleDefinition =
            serde_yaml::from_str(source).map_err(|source| Error::Compile {
                path: path.clone(),
                source,
            })?;

        let module = Arc::new(CheckModule {
            identity: identity.clone(),
            path,
            digest,
            definition,
        });
        self.modules.insert(identity, Arc::clone(&module));

        Ok(LoadedModule {
            module,
            fresh: true,
        })
    }

    /// Forget a module, e.g. after it failed verification
    pub fn discard(&mut self, identity: &str) -> Option<Arc<CheckModule>> {
        self.modules.remove(identity)
    }

    pub fn get(&self, identity: &str) -> Option<Arc<CheckModule>> {
        self.modules.get(identity).cloned()
    }

    /// Number of distinct modules loaded
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
