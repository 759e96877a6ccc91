//! Error types for the Glint engine

use thiserror::Error;

/// Result type alias using Glint Error
pub type Result<T> = std::result::Result<T, Error>;

/// Glint error types
#[derive(Error, Debug)]
pub enum Error {
    // === Module Loading Errors ===
    #[error("Load failed: {locator} - {message}")]
    Load { locator: String, message: String },

    #[error("Compile module failed: {path}")]
    Compile {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Verify failed: {module} - {message}")]
    Verify { module: String, message: String },

    // === Check Errors ===
    #[error("Check failed: {check} - {message}")]
    CheckFailed { check: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    // === Output Errors ===
    #[error("Output sink {sink} failed: {message}")]
    Output { sink: String, message: String },

    // === Target Errors ===
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a verification error for a module
    pub fn verify(module: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Verify {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Build a check runtime error
    pub fn check_failed(check: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CheckFailed {
            check: check.into(),
            message: message.into(),
        }
    }

    /// Build an output sink error
    pub fn output(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Output {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Errors raised while loading a single check; these skip the check, not the run
    pub fn is_load_phase(&self) -> bool {
        matches!(
            self,
            Error::Load { .. } | Error::Compile { .. } | Error::Verify { .. } | Error::FileNotFound { .. }
        )
    }

    /// Check if this error is fatal (should stop the run)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Output { .. } | Error::Configuration(_) | Error::Internal(_)
        )
    }

    /// Get an error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Error::Load { .. } => "LOAD_ERROR",
            Error::Compile { .. } => "COMPILE_ERROR",
            Error::Verify { .. } => "VERIFY_ERROR",
            Error::CheckFailed { .. } => "CHECK_FAILED",
            Error::Request { .. } => "REQUEST_ERROR",
            Error::Output { .. } => "OUTPUT_ERROR",
            Error::InvalidTarget(_) => "INVALID_TARGET",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::FileNotFound { .. } => "FILE_NOT_FOUND",
            Error::Json(_) => "JSON_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "OTHER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::verify("m", "x").code(), "VERIFY_ERROR");
        assert_eq!(Error::output("text", "disk full").code(), "OUTPUT_ERROR");
        assert_eq!(Error::InvalidTarget(String::new()).code(), "INVALID_TARGET");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::verify("m", "non-existent class: Poc").is_load_phase());
        assert!(!Error::verify("m", "x").is_fatal());
        assert!(Error::output("console", "broken pipe").is_fatal());
        assert!(!Error::check_failed("web/x", "boom").is_load_phase());
    }

    #[test]
    fn test_compile_error_keeps_source() {
        use std::error::Error as _;

        let cause = serde_yaml::from_str::<serde_yaml::Value>("a: [1, 2").unwrap_err();
        let err = Error::Compile {
            path: "glint://broken".into(),
            source: cause,
        };
        assert_eq!(err.to_string(), "Compile module failed: glint://broken");
        assert!(err.source().is_some());
    }
}
