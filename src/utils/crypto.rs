//! AES-GCM encryption for national-ID data.
//!
//! Ciphertexts carry their random 12-byte nonce as a prefix and are
//! exchanged base64-encoded, so a single string column can hold them.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;

use crate::config::NID_KEY_BYTES;
use crate::errors::{AppError, AppResult};

/// Nonce size for AES-GCM (96 bits / 12 bytes).
const NONCE_SIZE: usize = 12;

/// Encryptor for national-ID values.
#[derive(Clone)]
pub struct Encryptor {
    cipher: Aes256Gcm,
}

impl Encryptor {
    /// Create a new encryptor from a base64-encoded 32-byte key.
    pub fn from_base64(key_base64: &str) -> AppResult<Self> {
        let key_bytes = BASE64
            .decode(key_base64)
            .map_err(|e| AppError::crypto(format!("Invalid base64 key: {}", e)))?;

        Self::from_bytes(&key_bytes)
    }

    /// Create a new encryptor from raw key bytes.
    pub fn from_bytes(key_bytes: &[u8]) -> AppResult<Self> {
        if key_bytes.len() != NID_KEY_BYTES {
            return Err(AppError::crypto(format!(
                "Invalid key length: expected {} bytes, got {}",
                NID_KEY_BYTES,
                key_bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(key_bytes)
            .map_err(|e| AppError::crypto(format!("Failed to create cipher: {}", e)))?;

        Ok(Self { cipher })
    }

    /// Encrypt a plaintext, returning base64 of nonce || ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| AppError::crypto(format!("Encryption failed: {}", e)))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypt a base64-encoded nonce || ciphertext payload.
    pub fn decrypt(&self, encoded: &str) -> AppResult<String> {
        let combined = BASE64
            .decode(encoded)
            .map_err(|e| AppError::crypto(format!("Invalid base64 ciphertext: {}", e)))?;

        if combined.len() < NONCE_SIZE {
            return Err(AppError::crypto("Ciphertext too short"));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| AppError::crypto(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| AppError::crypto(format!("Decrypted payload is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> String {
        BASE64.encode([0x41u8; NID_KEY_BYTES])
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let enc = Encryptor::from_base64(&test_key()).unwrap();
        let ciphertext = enc.encrypt("1234567890").unwrap();
        assert_eq!(enc.decrypt(&ciphertext).unwrap(), "1234567890");
    }

    #[test]
    fn random_nonce_produces_distinct_ciphertexts() {
        let enc = Encryptor::from_base64(&test_key()).unwrap();
        let a = enc.encrypt("same input").unwrap();
        let b = enc.encrypt("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let enc = Encryptor::from_base64(&test_key()).unwrap();
        let other = Encryptor::from_bytes(&[0x42u8; NID_KEY_BYTES]).unwrap();

        let ciphertext = enc.encrypt("secret").unwrap();
        assert!(other.decrypt(&ciphertext).is_err());
    }

    #[test]
    fn rejects_short_key() {
        assert!(Encryptor::from_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn rejects_invalid_base64() {
        let enc = Encryptor::from_base64(&test_key()).unwrap();
        assert!(enc.decrypt("not base64!!!").is_err());
    }

    #[test]
    fn rejects_truncated_ciphertext() {
        let enc = Encryptor::from_base64(&test_key()).unwrap();
        let short = BASE64.encode([0u8; 4]);
        assert!(enc.decrypt(&short).is_err());
    }
}
