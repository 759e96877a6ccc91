//! Module verifier - gatekeeper between loading and registration

use crate::builtin::{BuiltinArgs, BuiltinCatalog, BuiltinFactory};
use crate::context::CheckContext;
use crate::declared::{BannerProbe, DeclaredCheck, HttpProbe, Probe};
use crate::definition::CheckSpec;
use crate::loader::CheckModule;
use glint_core::{Check, CheckMetadata, Error, Result};
use std::sync::Arc;

/// How one instance of a verified module is built
#[derive(Clone)]
enum Blueprint {
    Declared(Probe),
    Builtin {
        factory: BuiltinFactory,
        params: serde_yaml::Value,
    },
}

/// A module that passed verification and can be instantiated
pub struct VerifiedModule {
    identity: String,
    metadata: CheckMetadata,
    blueprints: Vec<Blueprint>,
}

impl VerifiedModule {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    /// Number of instances this module yields
    pub fn instance_count(&self) -> usize {
        self.blueprints.len()
    }

    /// Build the check instances, named `name`, or `name#1..#N` for several
    pub fn instantiate(&self, name: &str, context: &CheckContext) -> Result<Vec<Arc<dyn Check>>> {
        let multiple = self.blueprints.len() > 1;
        self.blueprints
            .iter()
            .enumerate()
            .map(|(i, blueprint)| {
                let instance_name = if multiple {
                    format!("{}#{}", name, i + 1)
                } else {
                    name.to_string()
                };
                match blueprint {
                    Blueprint::Declared(probe) => Ok(Arc::new(DeclaredCheck::new(
                        instance_name,
                        self.metadata.clone(),
                        probe.clone(),
                        context.clone(),
                    )) as Arc<dyn Check>),
                    Blueprint::Builtin { factory, params } => factory(&BuiltinArgs {
                        name: &instance_name,
                        metadata: &self.metadata,
                        params,
                        context,
                    }),
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for VerifiedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifiedModule")
            .field("identity", &self.identity)
            .field("instances", &self.blueprints.len())
            .finish()
    }
}

/// Verify that a loaded module exposes `poc.check` and that every check
/// spec in it is usable.
pub fn verify_module(module: &CheckModule, catalog: &BuiltinCatalog) -> Result<VerifiedModule> {
    let identity = module.identity();
    let definition = module.definition();

    let poc = definition
        .poc
        .as_ref()
        .ok_or_else(|| Error::verify(identity, "non-existent class: Poc"))?;
    let specs = poc
        .check
        .as_ref()
        .map(|c| c.as_slice())
        .filter(|specs| !specs.is_empty())
        .ok_or_else(|| Error::verify(identity, "non-existent method: Poc.check"))?;

    let blueprints = specs
        .iter()
        .map(|spec| blueprint(identity, spec, catalog))
        .collect::<Result<Vec<_>>>()?;

    Ok(VerifiedModule {
        identity: identity.to_string(),
        metadata: definition.info.clone(),
        blueprints,
    })
}

fn blueprint(identity: &str, spec: &CheckSpec, catalog: &BuiltinCatalog) -> Result<Blueprint> {
    let invalid = |message: String| Error::verify(identity, message);
    match spec {
        CheckSpec::Http(http) => Ok(Blueprint::Declared(Probe::Http(
            HttpProbe::compile(http).map_err(invalid)?,
        ))),
        CheckSpec::TcpBanner(banner) => Ok(Blueprint::Declared(Probe::Banner(
            BannerProbe::compile(banner).map_err(invalid)?,
        ))),
        CheckSpec::Builtin(builtin) => {
            let factory = catalog
                .get(&builtin.key)
                .ok_or_else(|| invalid(format!("non-existent builtin: {}", builtin.key)))?;
            Ok(Blueprint::Builtin {
                factory,
                params: builtin.params.clone(),
            })
        }
    }
}
