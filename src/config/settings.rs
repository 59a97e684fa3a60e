//! Application settings loaded from environment variables.

use std::env;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::constants::{
    DEFAULT_AWS_REGION, DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    NID_KEY_BYTES,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Firebase project id used to validate ID-token audience and issuer
    pub firebase_project_id: String,
    pub aws_region: String,
    pub s3_bucket: String,
    /// Optional endpoint override for S3-compatible stores (local stacks)
    pub s3_endpoint: Option<String>,
    nid_encryption_key: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("firebase_project_id", &self.firebase_project_id)
            .field("aws_region", &self.aws_region)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("nid_encryption_key", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if FIREBASE_PROJECT_ID or NID_ENCRYPTION_KEY are missing in a
    /// release build, or if the encryption key does not decode to 32 bytes.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let firebase_project_id = env::var("FIREBASE_PROJECT_ID").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("FIREBASE_PROJECT_ID not set, using development placeholder");
                "urbannest-dev".to_string()
            } else {
                panic!("FIREBASE_PROJECT_ID environment variable must be set in production");
            }
        });

        let nid_encryption_key = env::var("NID_ENCRYPTION_KEY").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("NID_ENCRYPTION_KEY not set, using insecure development key");
                BASE64.encode([0u8; NID_KEY_BYTES])
            } else {
                panic!("NID_ENCRYPTION_KEY environment variable must be set in production");
            }
        });

        // Fail fast on a malformed key rather than at the first registration
        match BASE64.decode(&nid_encryption_key) {
            Ok(bytes) if bytes.len() == NID_KEY_BYTES => {}
            _ => panic!("NID_ENCRYPTION_KEY must be base64 of exactly {NID_KEY_BYTES} bytes"),
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            firebase_project_id,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_AWS_REGION.to_string()),
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "urbannest-media".to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            nid_encryption_key,
        }
    }

    /// Get the base64-encoded national-ID encryption key.
    pub fn nid_encryption_key(&self) -> &str {
        &self.nid_encryption_key
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
