//! Checks declared in YAML: HTTP probes and TCP banner matches

use crate::banner::{first_line, BannerGrabber};
use crate::context::CheckContext;
use crate::definition::{BannerSpec, HttpMatchers, HttpSpec};
use crate::http::{parse_method, HttpResponse};
use glint_core::{Check, CheckMetadata, CheckOutcome, Error, Result, Target};
use regex::Regex;
use reqwest::Method;
use std::collections::BTreeMap;

/// Longest banner excerpt kept in outcome extras
const BANNER_EXCERPT: usize = 200;

/// Validated HTTP request and matchers
#[derive(Debug, Clone)]
pub struct HttpProbe {
    method: Method,
    path: String,
    headers: BTreeMap<String, String>,
    body: Option<String>,
    status: Option<u16>,
    body_contains: Vec<String>,
    body_regex: Option<Regex>,
    header_matchers: BTreeMap<String, String>,
    any_matcher: bool,
    message: Option<String>,
}

impl HttpProbe {
    /// Validate a spec; the error message names the offending field
    pub fn compile(spec: &HttpSpec) -> std::result::Result<Self, String> {
        let method = parse_method(&spec.method)
            .ok_or_else(|| format!("invalid HTTP method: {}", spec.method))?;
        let HttpMatchers {
            status,
            body_contains,
            body_regex,
            headers,
        } = &spec.matchers;
        let body_regex = body_regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| format!("invalid body_regex: {}", e))?;

        Ok(Self {
            method,
            path: spec.path.clone(),
            headers: spec.headers.clone(),
            body: spec.body.clone(),
            status: *status,
            body_contains: body_contains.clone(),
            body_regex,
            header_matchers: headers.clone(),
            any_matcher: !spec.matchers.is_empty(),
            message: spec.message.clone(),
        })
    }

    /// Whether the response satisfies every configured matcher
    pub fn matches(&self, response: &HttpResponse) -> bool {
        if !self.any_matcher {
            return response.is_success();
        }
        if let Some(status) = self.status {
            if response.status != status {
                return false;
            }
        }
        if !self.body_contains.iter().all(|s| response.body.contains(s)) {
            return false;
        }
        if let Some(re) = &self.body_regex {
            if !re.is_match(&response.body) {
                return false;
            }
        }
        self.header_matchers.iter().all(|(name, expected)| {
            response
                .header(name)
                .map(|value| value.contains(expected.as_str()))
                .unwrap_or(false)
        })
    }

    fn run(&self, ctx: &CheckContext, target: &Target) -> Result<CheckOutcome> {
        let url = target.join(&self.path);
        let response = ctx
            .http
            .send(self.method.clone(), &url, &self.headers, self.body.as_deref())?;

        let outcome = if self.matches(&response) {
            CheckOutcome::vulnerable(self.message.as_deref().unwrap_or("response matched"))
        } else {
            CheckOutcome::not_vulnerable("response not matched")
        };
        Ok(outcome
            .with_url(url)
            .with_extra("status_code", response.status.to_string()))
    }
}

/// Validated TCP banner probe
#[derive(Debug, Clone)]
pub struct BannerProbe {
    port: Option<u16>,
    send: Option<String>,
    pattern: Regex,
    message: Option<String>,
}

impl BannerProbe {
    pub fn compile(spec: &BannerSpec) -> std::result::Result<Self, String> {
        let pattern =
            Regex::new(&spec.pattern).map_err(|e| format!("invalid banner pattern: {}", e))?;
        Ok(Self {
            port: spec.port,
            send: spec.send.clone(),
            pattern,
            message: spec.message.clone(),
        })
    }

    fn run(&self, name: &str, ctx: &CheckContext, target: &Target) -> Result<CheckOutcome> {
        let port = self
            .port
            .or_else(|| target.port())
            .ok_or_else(|| Error::check_failed(name, "no port configured or given in target"))?;
        let host = target.host();

        let banner = BannerGrabber::new()
            .with_connect_timeout(ctx.connect_timeout)
            .with_read_timeout(ctx.read_timeout)
            .grab(host, port, self.send.as_deref().map(str::as_bytes))?;

        let excerpt: String = first_line(&banner).chars().take(BANNER_EXCERPT).collect();
        let url = format!("tcp://{}:{}", host, port);

        let outcome = match self.pattern.captures(&banner) {
            Some(caps) => {
                let mut outcome =
                    CheckOutcome::vulnerable(self.message.as_deref().unwrap_or("banner matched"));
                if let Some(version) = caps.get(1) {
                    outcome = outcome.with_extra("version", version.as_str());
                }
                outcome
            }
            None => CheckOutcome::not_vulnerable("banner not matched"),
        };
        Ok(outcome.with_url(url).with_extra("banner", excerpt))
    }
}

/// A validated probe of either declarative kind
#[derive(Debug, Clone)]
pub enum Probe {
    Http(HttpProbe),
    Banner(BannerProbe),
}

/// Check instance backed by a declarative probe
pub struct DeclaredCheck {
    name: String,
    metadata: CheckMetadata,
    probe: Probe,
    context: CheckContext,
}

impl DeclaredCheck {
    pub fn new(
        name: impl Into<String>,
        metadata: CheckMetadata,
        probe: Probe,
        context: CheckContext,
    ) -> Self {
        Self {
            name: name.into(),
            metadata,
            probe,
            context,
        }
    }
}

impl Check for DeclaredCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn check(&self, target: &Target) -> Result<CheckOutcome> {
        match &self.probe {
            Probe::Http(probe) => probe.run(&self.context, target),
            Probe::Banner(probe) => probe.run(&self.name, &self.context, target),
        }
    }
}
