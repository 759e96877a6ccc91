//! Target definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;

/// A resolved identifier a check is evaluated against (URL, host, address)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

/// What a target string looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Has a scheme (e.g., "https://app.example.com")
    Url,
    /// Single IP address
    Ip,
    /// CIDR notation
    Cidr,
    /// Anything else, treated as a host name
    Hostname,
}

impl Target {
    /// Parse a target from a string, rejecting empty input
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidTarget("empty target".into()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(Error::InvalidTarget(format!("whitespace in target: {}", s)));
        }
        Ok(Target(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Auto-detect the kind of target
    pub fn kind(&self) -> TargetKind {
        let s = self.0.as_str();
        if s.contains("://") {
            TargetKind::Url
        } else if s.parse::<IpAddr>().is_ok() {
            TargetKind::Ip
        } else if s.contains('/') {
            TargetKind::Cidr
        } else {
            TargetKind::Hostname
        }
    }

    /// Base URL for HTTP checks; bare hosts get an `http://` scheme
    pub fn base_url(&self) -> String {
        match self.kind() {
            TargetKind::Url => self.0.trim_end_matches('/').to_string(),
            _ => format!("http://{}", self.0.trim_end_matches('/')),
        }
    }

    /// Join a request path onto the base URL
    pub fn join(&self, path: &str) -> String {
        let base = self.base_url();
        if path.is_empty() {
            base
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    fn authority(&self) -> &str {
        let s = self.0.as_str();
        let rest = match s.find("://") {
            Some(idx) => &s[idx + 3..],
            None => s,
        };
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let authority = &rest[..end];
        match authority.rfind('@') {
            Some(idx) => &authority[idx + 1..],
            None => authority,
        }
    }

    /// Host name or address without scheme, credentials, port or path
    pub fn host(&self) -> &str {
        let authority = self.authority();
        if let Some(stripped) = authority.strip_prefix('[') {
            return stripped.split(']').next().unwrap_or(stripped);
        }
        if authority.parse::<IpAddr>().is_ok() {
            return authority;
        }
        authority.split(':').next().unwrap_or(authority)
    }

    /// Port given explicitly in the target, if any
    pub fn port(&self) -> Option<u16> {
        let authority = self.authority();
        let after_host = match authority.rfind(']') {
            Some(idx) => &authority[idx + 1..],
            None if authority.parse::<IpAddr>().is_ok() => "",
            None => authority,
        };
        after_host
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse().ok())
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Target::parse(s)
    }
}

/// Drop repeated targets, keeping the first occurrence and the original order
pub fn dedup_targets(targets: impl IntoIterator<Item = Target>) -> Vec<Target> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|target| seen.insert(target.clone()))
        .collect()
}
