//! Check loading phase - load, verify, instantiate and register check sources

use crate::builtin::BuiltinCatalog;
use crate::context::CheckContext;
use crate::loader::ModuleLoader;
use crate::registry::CheckRegistry;
use crate::verify::verify_module;
use glint_core::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A check source that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    pub name: String,
    pub error: Error,
}

/// Summary of the load phase
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Instances registered per category
    pub counts: BTreeMap<String, usize>,
    /// Sources skipped, in the order they failed
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Total number of instances registered
    pub fn loaded(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Drives every check source through load → verify → instantiate → register.
///
/// Failures are recorded per source and never stop the phase.
pub struct CheckLoader {
    modules: ModuleLoader,
    catalog: BuiltinCatalog,
    context: CheckContext,
    registry: CheckRegistry,
    report: LoadReport,
}

impl CheckLoader {
    pub fn new(catalog: BuiltinCatalog, context: CheckContext) -> Self {
        Self {
            modules: ModuleLoader::new(),
            catalog,
            context,
            registry: CheckRegistry::new(),
            report: LoadReport::default(),
        }
    }

    /// Load one source under its logical name.
    ///
    /// Returns the number of instances registered; zero when the identical
    /// module was already loaded.
    pub fn load_source(&mut self, name: &str, category: &str, source: &str) -> Result<usize> {
        let loaded = self.modules.load(source, Some(name))?;
        if !loaded.fresh {
            debug!("Check {} already loaded, skipping", name);
            return Ok(0);
        }

        let verified = match verify_module(&loaded.module, &self.catalog) {
            Ok(verified) => verified,
            Err(e) => {
                self.modules.discard(name);
                return Err(e);
            }
        };
        let instances = match verified.instantiate(name, &self.context) {
            Ok(instances) => instances,
            Err(e) => {
                self.modules.discard(name);
                return Err(e);
            }
        };

        let count = instances.len();
        if let Err(e) = self.registry.register(name, instances) {
            self.modules.discard(name);
            return Err(e);
        }
        *self.report.counts.entry(category.to_string()).or_insert(0) += count;
        Ok(count)
    }

    /// Accept a resolved source (or the error resolving it) and record the outcome
    pub fn add(&mut self, name: &str, category: &str, source: Result<String>) {
        let result = source.and_then(|text| self.load_source(name, category, &text));
        match result {
            Ok(count) => info!("Load {} check: loaded {} ({} instance(s))", category, name, count),
            Err(e) => self.record_failure(name, e),
        }
    }

    /// Record a source that failed before or during loading
    pub fn record_failure(&mut self, name: &str, error: Error) {
        error!("Load check {} error: {}", name, error);
        self.report.failures.push(LoadFailure {
            name: name.to_string(),
            error,
        });
    }

    /// Load every `*.yaml`/`*.yml` file below `dir`
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        info!("Loading checks from: {}", dir.display());
        for path in discover_sources(dir)? {
            let (name, category) = logical_name(&path);
            let source = std::fs::read_to_string(&path).map_err(|e| Error::Load {
                locator: path.display().to_string(),
                message: e.to_string(),
            });
            self.add(&name, &category, source);
        }
        Ok(())
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Finish the load phase, freezing the registry
    pub fn finish(self) -> (CheckRegistry, LoadReport) {
        for (category, count) in &self.report.counts {
            info!("Load {} checks: loaded [{}] checks", category, count);
        }
        (self.registry, self.report)
    }
}

/// Find check definition files below `dir`, sorted by path
pub fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound {
            path: dir.display().to_string(),
        });
    }
    let mut found = Vec::new();
    collect_recursive(dir, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_recursive(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_recursive(&path, found)?;
        } else if is_definition_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

/// Whether a path looks like a check definition
pub fn is_definition_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Logical `<category>/<stem>` name and category of a definition file
pub fn logical_name(path: &Path) -> (String, String) {
    let category = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("_"));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    (format!("{}/{}", category, stem), category)
}

/// Load all checks from a directory
pub fn load_checks_from_dir(
    dir: impl AsRef<Path>,
    catalog: BuiltinCatalog,
    context: CheckContext,
) -> Result<(CheckRegistry, LoadReport)> {
    let mut loader = CheckLoader::new(catalog, context);
    loader.load_dir(dir)?;
    Ok(loader.finish())
}
