//! Glint Checks - Module loader, verifier, registry, and check kinds
//!
//! This crate provides:
//! - `ModuleLoader`: Turns YAML source text into named, cached check modules
//! - `verify_module`: Rejects modules that do not expose `poc.check`
//! - `CheckRegistry`: Verified check instances keyed by logical name
//! - `CheckLoader`: The load phase over many sources, with per-source failure reporting
//! - Declarative `http` / `tcp-banner` checks and the `BuiltinCatalog`

pub mod banner;
pub mod builtin;
pub mod context;
pub mod declared;
pub mod definition;
pub mod discovery;
pub mod http;
pub mod loader;
pub mod registry;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

pub use builtin::{BuiltinArgs, BuiltinCatalog};
pub use context::CheckContext;
pub use discovery::{load_checks_from_dir, CheckLoader, LoadFailure, LoadReport};
pub use loader::{CheckModule, LoadedModule, ModuleLoader};
pub use registry::CheckRegistry;
pub use verify::{verify_module, VerifiedModule};
