//! Shared resources handed to every check instance

use crate::http::HttpClient;
use glint_common::config::RequestConfig;
use glint_core::Result;
use std::sync::Arc;
use std::time::Duration;

/// Explicit context threaded through check construction
#[derive(Clone)]
pub struct CheckContext {
    /// HTTP client shared by all HTTP-based checks
    pub http: Arc<HttpClient>,
    /// TCP connect timeout for banner checks
    pub connect_timeout: Duration,
    /// TCP read timeout for banner checks
    pub read_timeout: Duration,
}

impl CheckContext {
    pub fn new(request: &RequestConfig) -> Result<Self> {
        Ok(Self {
            http: Arc::new(HttpClient::new(request)?),
            connect_timeout: request.timeout(),
            read_timeout: request.timeout(),
        })
    }

    pub fn with_tcp_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }
}

impl std::fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckContext")
            .field("http", &"...")
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}
