//! SHA-512 digest helper for national-ID deduplication.

use sha2::{Digest, Sha512};

/// Hash an input to its lowercase hex SHA-512 digest.
///
/// Used to store a non-reversible fingerprint of the national ID so
/// uniqueness can be enforced without keeping the plaintext around.
pub fn sha512_hex(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_consistent_hash() {
        let hash1 = sha512_hex("test-input");
        let hash2 = sha512_hex("test-input");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn returns_sha512_length() {
        // SHA-512 = 512 bits = 128 hex chars
        let hash = sha512_hex("test");
        assert_eq!(hash.len(), 128);
    }

    #[test]
    fn different_inputs_produce_different_hashes() {
        assert_ne!(sha512_hex("input1"), sha512_hex("input2"));
    }

    #[test]
    fn returns_lowercase_hex() {
        let hash = sha512_hex("test");
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
