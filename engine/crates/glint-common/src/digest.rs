//! Content digests used to identify check modules

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute SHA-256 hash and return as hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Identity for a module loaded without an explicit name
pub fn module_identity(source: &str) -> String {
    format!("pocs_{}", sha256_hex(source.as_bytes()))
}
