//! Firebase ID-token verification.
//!
//! Tokens are verified locally (RS256) against the JWKs Google publishes
//! for the `securetoken` service account. Keys are cached and refreshed
//! when stale or when an unknown key id shows up.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::{Config, FIREBASE_ISSUER_PREFIX, FIREBASE_JWK_URL, FIREBASE_KEY_TTL_SECONDS};
use crate::errors::{AppError, AppResult};

/// Identity claims carried by a verified Firebase ID token
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseClaims {
    /// Firebase UID
    pub sub: String,
    /// Display name, when the provider supplies one
    pub name: Option<String>,
    /// Email address, when the provider supplies one
    pub email: Option<String>,
    /// Profile picture URL, when the provider supplies one
    pub picture: Option<String>,
}

/// Token verifier trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw ID token and return its identity claims
    async fn verify(&self, token: &str) -> AppResult<FirebaseClaims>;
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

/// Firebase ID-token verifier with a cached Google key set.
pub struct FirebaseAuth {
    project_id: String,
    issuer: String,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl FirebaseAuth {
    /// Create a verifier for the configured Firebase project.
    pub fn new(config: &Config) -> Self {
        Self {
            project_id: config.firebase_project_id.clone(),
            issuer: format!("{}{}", FIREBASE_ISSUER_PREFIX, config.firebase_project_id),
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache {
                keys: HashMap::new(),
                fetched_at: None,
            }),
        }
    }

    /// Resolve the decoding key for a key id, refreshing the set when the
    /// cache is stale or the id is unknown.
    async fn decoding_key(&self, kid: &str) -> AppResult<DecodingKey> {
        {
            let cache = self.cache.read().await;
            if let Some(fetched_at) = cache.fetched_at {
                if fetched_at.elapsed() < Duration::from_secs(FIREBASE_KEY_TTL_SECONDS) {
                    if let Some(key) = cache.keys.get(kid) {
                        return Ok(key.clone());
                    }
                }
            }
        }

        self.refresh_keys().await?;

        let cache = self.cache.read().await;
        cache.keys.get(kid).cloned().ok_or(AppError::Unauthorized)
    }

    async fn refresh_keys(&self) -> AppResult<()> {
        let jwks: JwkSet = self
            .http
            .get(FIREBASE_JWK_URL)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| AppError::internal(format!("Failed to fetch Firebase keys: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::internal(format!("Malformed Firebase key set: {e}")))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;
            keys.insert(jwk.kid, key);
        }

        tracing::debug!(count = keys.len(), "Refreshed Firebase signing keys");

        let mut cache = self.cache.write().await;
        cache.keys = keys;
        cache.fetched_at = Some(Instant::now());
        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for FirebaseAuth {
    async fn verify(&self, token: &str) -> AppResult<FirebaseClaims> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AppError::Unauthorized)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<FirebaseClaims>(token, &key, &validation)?;
        Ok(data.claims)
    }
}
