//! Shared SHA-256 hex digest utility.
//!
//! Session tokens are persisted as digests so a database leak does not expose
//! live bearer tokens.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn distinct_tokens_produce_distinct_digests() {
        let a = sha256_hex(b"eyJhbGciOiJIUzI1NiJ9.a.b");
        let b = sha256_hex(b"eyJhbGciOiJIUzI1NiJ9.a.c");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
