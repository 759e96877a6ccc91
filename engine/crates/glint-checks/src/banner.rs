//! Banner grabbing over plain TCP

use glint_core::{Error, Result};
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::trace;

/// Banner grabber with configurable timeouts
pub struct BannerGrabber {
    /// Timeout for each connection attempt
    connect_timeout: Duration,
    /// Timeout for reading data
    read_timeout: Duration,
    /// Maximum banner size to read
    max_banner_size: usize,
}

impl Default for BannerGrabber {
    fn default() -> Self {
        Self::new()
    }
}

impl BannerGrabber {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(3),
            max_banner_size: 4096,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Connect, optionally send a probe, and read whatever the service answers.
    ///
    /// A service that stays silent yields an empty banner, not an error.
    pub fn grab(&self, host: &str, port: u16, probe: Option<&[u8]>) -> Result<String> {
        let endpoint = format!("{}:{}", host, port);
        let unreachable = |message: String| Error::Request {
            url: format!("tcp://{}", endpoint),
            message,
        };

        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| unreachable(format!("resolve failed: {}", e)))?;

        let mut last_error = String::from("no addresses resolved");
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    trace!("Failed to connect to {}: {}", addr, e);
                    last_error = e.to_string();
                }
            }
        }
        let mut stream = stream.ok_or_else(|| unreachable(last_error))?;

        stream.set_read_timeout(Some(self.read_timeout))?;
        if let Some(probe) = probe {
            stream.write_all(probe)?;
        }

        let mut buffer = vec![0u8; self.max_banner_size];
        let n = match stream.read(&mut buffer) {
            Ok(n) => n,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => 0,
            Err(e) => return Err(unreachable(e.to_string())),
        };
        buffer.truncate(n);

        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

/// First non-empty line of a banner, trimmed for display
pub fn first_line(banner: &str) -> &str {
    banner
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}
