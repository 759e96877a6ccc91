//! Blocking HTTP client shared by HTTP-based checks

use glint_common::config::RequestConfig;
use glint_core::{Error, Result};
use reqwest::blocking::Client;
use reqwest::{header, Method};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::{debug, warn};

/// HTTP response wrapper
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: String,
    /// Final URL (after redirects)
    pub final_url: String,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl HttpResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }
}

/// Thin wrapper over a blocking reqwest client configured from `[request]`
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: &RequestConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();

        for (name, value) in &config.headers {
            match (
                header::HeaderName::from_bytes(name.as_bytes()),
                header::HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Ignoring invalid request header: {}", name),
            }
        }

        let mut builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .danger_accept_invalid_certs(config.insecure);
        builder = match &config.proxy {
            Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
                Error::Configuration(format!("Invalid proxy {}: {}", proxy, e))
            })?),
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Send a request and read the whole response
    pub fn send(
        &self,
        method: Method,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: Option<&str>,
    ) -> Result<HttpResponse> {
        let start = Instant::now();
        let mut request = self.client.request(method.clone(), url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let request_error = |e: reqwest::Error| Error::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = request.send().map_err(request_error)?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().map_err(request_error)?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        debug!("{} {} -> {} ({}ms)", method, url, status, response_time_ms);

        Ok(HttpResponse {
            status,
            headers,
            body,
            final_url,
            response_time_ms,
        })
    }

    pub fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(Method::GET, url, &BTreeMap::new(), None)
    }
}

/// Parse an HTTP method name
pub fn parse_method(name: &str) -> Option<Method> {
    Method::from_bytes(name.trim().to_uppercase().as_bytes()).ok()
}
