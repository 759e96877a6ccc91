//! Checks compiled into the binary, selected from YAML by key

use crate::context::CheckContext;
use glint_core::{Check, CheckMetadata, CheckOutcome, Error, Result, Target};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything a builtin factory needs to construct an instance
pub struct BuiltinArgs<'a> {
    pub name: &'a str,
    pub metadata: &'a CheckMetadata,
    pub params: &'a serde_yaml::Value,
    pub context: &'a CheckContext,
}

impl BuiltinArgs<'_> {
    /// Deserialize `params`, treating a missing block as all defaults
    pub fn params<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.params.is_null() {
            return Ok(T::default());
        }
        serde_yaml::from_value(self.params.clone())
            .map_err(|e| Error::verify(self.name, format!("invalid params: {}", e)))
    }
}

/// Constructor for a builtin check instance
pub type BuiltinFactory = Arc<dyn Fn(&BuiltinArgs<'_>) -> Result<Arc<dyn Check>> + Send + Sync>;

/// Catalog of builtin checks keyed by name
#[derive(Clone, Default)]
pub struct BuiltinCatalog {
    factories: BTreeMap<String, BuiltinFactory>,
}

impl BuiltinCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the checks shipped in this crate
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register("security-headers", |args| {
            Ok(Arc::new(SecurityHeadersCheck::new(args)?) as Arc<dyn Check>)
        });
        catalog.register("directory-listing", |args| {
            Ok(Arc::new(DirectoryListingCheck::new(args)?) as Arc<dyn Check>)
        });
        catalog
    }

    /// Register a factory under a key, replacing any previous one
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn(&BuiltinArgs<'_>) -> Result<Arc<dyn Check>> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Arc::new(factory));
    }

    pub fn get(&self, key: &str) -> Option<BuiltinFactory> {
        self.factories.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|k| k.as_str())
    }
}

impl std::fmt::Debug for BuiltinCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

// ── security-headers ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SecurityHeadersParams {
    path: String,
    headers: Vec<String>,
}

impl Default for SecurityHeadersParams {
    fn default() -> Self {
        Self {
            path: String::new(),
            headers: vec![
                "Strict-Transport-Security".into(),
                "Content-Security-Policy".into(),
                "X-Frame-Options".into(),
                "X-Content-Type-Options".into(),
            ],
        }
    }
}

/// Reports responses that lack any of the expected security headers
pub struct SecurityHeadersCheck {
    name: String,
    metadata: CheckMetadata,
    params: SecurityHeadersParams,
    context: CheckContext,
}

impl SecurityHeadersCheck {
    fn new(args: &BuiltinArgs<'_>) -> Result<Self> {
        Ok(Self {
            name: args.name.to_string(),
            metadata: args.metadata.clone(),
            params: args.params()?,
            context: args.context.clone(),
        })
    }
}

impl Check for SecurityHeadersCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn check(&self, target: &Target) -> Result<CheckOutcome> {
        let url = target.join(&self.params.path);
        let response = self.context.http.get(&url)?;

        let missing: Vec<&str> = self
            .params
            .headers
            .iter()
            .map(String::as_str)
            .filter(|name| response.header(name).is_none())
            .collect();

        let outcome = if missing.is_empty() {
            CheckOutcome::not_vulnerable("all security headers present")
        } else {
            CheckOutcome::vulnerable(format!("missing security headers: {}", missing.join(", ")))
                .with_extra("missing", missing.join(","))
        };
        Ok(outcome.with_url(url))
    }
}

// ── directory-listing ────────────────────────────────────────────────────────

const LISTING_MARKERS: &[&str] = &[
    "<title>Index of /",
    "<h1>Index of /",
    "<title>Directory listing for /",
];

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DirectoryListingParams {
    paths: Vec<String>,
}

impl Default for DirectoryListingParams {
    fn default() -> Self {
        Self {
            paths: vec![String::from("/")],
        }
    }
}

/// Reports paths whose response is an auto-generated directory index
pub struct DirectoryListingCheck {
    name: String,
    metadata: CheckMetadata,
    params: DirectoryListingParams,
    context: CheckContext,
}

impl DirectoryListingCheck {
    fn new(args: &BuiltinArgs<'_>) -> Result<Self> {
        let params: DirectoryListingParams = args.params()?;
        if params.paths.is_empty() {
            return Err(Error::verify(args.name, "invalid params: paths is empty"));
        }
        Ok(Self {
            name: args.name.to_string(),
            metadata: args.metadata.clone(),
            params,
            context: args.context.clone(),
        })
    }
}

impl Check for DirectoryListingCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn check(&self, target: &Target) -> Result<CheckOutcome> {
        for path in &self.params.paths {
            let url = target.join(path);
            let response = self.context.http.get(&url)?;
            if response.is_success() && LISTING_MARKERS.iter().any(|m| response.body.contains(m)) {
                return Ok(CheckOutcome::vulnerable("directory listing enabled").with_url(url));
            }
        }
        Ok(CheckOutcome::not_vulnerable("no directory listing").with_url(target.base_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_http;
    use glint_common::config::RequestConfig;
    use glint_core::Status;

    fn build(catalog: &BuiltinCatalog, key: &str, params: &str) -> Result<Arc<dyn Check>> {
        let context = CheckContext::new(&RequestConfig::default()).unwrap();
        let params: serde_yaml::Value = serde_yaml::from_str(params).unwrap();
        let metadata = CheckMetadata::default();
        let factory = catalog.get(key).unwrap();
        factory(&BuiltinArgs {
            name: "web/test",
            metadata: &metadata,
            params: &params,
            context: &context,
        })
    }

    #[test]
    fn test_default_catalog_keys() {
        let catalog = BuiltinCatalog::with_defaults();
        let keys: Vec<_> = catalog.keys().collect();
        assert_eq!(keys, vec!["directory-listing", "security-headers"]);
        assert!(!catalog.contains("rce"));
    }

    #[test]
    fn test_security_headers_missing() {
        let (base, handle) = serve_http(vec![(200, vec![("X-Frame-Options", "DENY")], "ok")]);
        let check = build(
            &BuiltinCatalog::with_defaults(),
            "security-headers",
            "headers: [X-Frame-Options, Content-Security-Policy]",
        )
        .unwrap();

        let outcome = check.check(&Target::parse(&base).unwrap()).unwrap();
        assert_eq!(outcome.status, Status::Vulnerable);
        assert_eq!(outcome.extra["missing"], "Content-Security-Policy");
        handle.join().unwrap();
    }

    #[test]
    fn test_directory_listing_detected() {
        let (base, handle) = serve_http(vec![
            (404, vec![], "nope"),
            (200, vec![], "<html><title>Index of /files</title></html>"),
        ]);
        let check = build(
            &BuiltinCatalog::with_defaults(),
            "directory-listing",
            "paths: [/backup/, /files/]",
        )
        .unwrap();

        let outcome = check.check(&Target::parse(&base).unwrap()).unwrap();
        assert_eq!(outcome.status, Status::Vulnerable);
        assert_eq!(outcome.url, format!("{}/files/", base));
        handle.join().unwrap();
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = build(&BuiltinCatalog::with_defaults(), "directory-listing", "paths: []")
            .err()
            .unwrap();
        assert_eq!(err.code(), "VERIFY_ERROR");

        let err = build(&BuiltinCatalog::with_defaults(), "security-headers", "headers: 5")
            .err()
            .unwrap();
        assert_eq!(err.code(), "VERIFY_ERROR");
    }

    #[test]
    fn test_custom_factory() {
        struct Fixed(CheckMetadata);

        impl Check for Fixed {
            fn name(&self) -> &str {
                "fixed"
            }
            fn metadata(&self) -> &CheckMetadata {
                &self.0
            }
            fn check(&self, _target: &Target) -> Result<CheckOutcome> {
                Ok(CheckOutcome::not_vulnerable("fixed"))
            }
        }

        let mut catalog = BuiltinCatalog::new();
        catalog.register("fixed", |args| Ok(Arc::new(Fixed(args.metadata.clone())) as Arc<dyn Check>));
        let check = build(&catalog, "fixed", "~").unwrap();
        let outcome = check.check(&Target::parse("example.com").unwrap()).unwrap();
        assert_eq!(outcome.msg, "fixed");
    }
}
