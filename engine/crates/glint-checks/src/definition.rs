//! YAML check module definitions

use glint_core::CheckMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A check module as written in a YAML source file.
///
/// Everything under `poc` is optional at parse time; the verifier decides
/// whether the module exposes enough to be trusted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// Descriptive information shown by `show-info`
    #[serde(default)]
    pub info: CheckMetadata,

    /// Entry point
    #[serde(default)]
    pub poc: Option<PocDefinition>,
}

/// Entry point of a module: one or more check specifications
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PocDefinition {
    #[serde(default)]
    pub check: Option<OneOrMany<CheckSpec>>,
}

/// Either a single value or a list of values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }
}

/// How a check instance evaluates a target, selected by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CheckSpec {
    /// Declarative HTTP request and response matchers
    Http(HttpSpec),
    /// TCP banner grab and regex match
    TcpBanner(BannerSpec),
    /// A check compiled into the binary, selected by key
    Builtin(BuiltinSpec),
}

impl CheckSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            CheckSpec::Http(_) => "http",
            CheckSpec::TcpBanner(_) => "tcp-banner",
            CheckSpec::Builtin(_) => "builtin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSpec {
    #[serde(default = "default_method")]
    pub method: String,
    /// Path joined onto the target's base URL
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub matchers: HttpMatchers,
    /// Message reported when every matcher holds
    #[serde(default)]
    pub message: Option<String>,
}

fn default_method() -> String {
    String::from("GET")
}

/// Response conditions; all configured matchers must hold.
/// With none configured, any 2xx response matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpMatchers {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub body_contains: Vec<String>,
    #[serde(default)]
    pub body_regex: Option<String>,
    /// Header name → substring expected in its value
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl HttpMatchers {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.body_contains.is_empty()
            && self.body_regex.is_none()
            && self.headers.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerSpec {
    /// Port to connect to; falls back to the port in the target
    #[serde(default)]
    pub port: Option<u16>,
    /// Probe sent after connecting
    #[serde(default)]
    pub send: Option<String>,
    /// Regex matched against the banner; group 1 is reported as the version
    pub pattern: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinSpec {
    pub key: String,
    #[serde(default)]
    pub params: serde_yaml::Value,
}
