//! Check status codes

use serde::{Deserialize, Serialize};

/// Outcome status of a single check execution.
///
/// Serialized as the integer codes used in result files: `-1` error,
/// `0` vulnerable, `1` not vulnerable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Status {
    /// The check could not complete
    Error,
    /// The target is affected
    Vulnerable,
    /// The target is not affected
    NotVulnerable,
}

impl Status {
    /// Numeric status code
    pub fn code(&self) -> i8 {
        match self {
            Status::Error => -1,
            Status::Vulnerable => 0,
            Status::NotVulnerable => 1,
        }
    }

    /// Single-character marker used by text output
    pub fn sign(&self) -> char {
        match self {
            Status::Vulnerable => '+',
            Status::NotVulnerable => '-',
            Status::Error => '!',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Error => "error",
            Status::Vulnerable => "vulnerable",
            Status::NotVulnerable => "not vulnerable",
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        matches!(self, Status::Vulnerable)
    }
}

impl From<Status> for i8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<i8> for Status {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, String> {
        match code {
            -1 => Ok(Status::Error),
            0 => Ok(Status::Vulnerable),
            1 => Ok(Status::NotVulnerable),
            other => Err(format!("unknown status code {}", other)),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
