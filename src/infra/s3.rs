//! S3 object storage client with presigned URL support.
//!
//! Clients never stream file bytes through this service: uploads and
//! downloads go straight to the bucket with short-lived presigned URLs.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client as S3Client;

use crate::config::{Config, DOWNLOAD_URL_TTL_SECONDS, UPLOAD_URL_TTL_SECONDS};
use crate::errors::{AppError, AppResult};

/// Object storage trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Presign a PUT for uploading an object (15-minute lifetime)
    async fn presign_upload(&self, key: &str, content_type: &str) -> AppResult<String>;

    /// Presign a GET for downloading an object (60-minute lifetime)
    async fn presign_download(&self, key: &str) -> AppResult<String>;

    /// Delete an object by key
    async fn delete_object(&self, key: &str) -> AppResult<()>;
}

/// Concrete implementation of ObjectStorage backed by the AWS SDK.
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    /// Build a client from application configuration.
    ///
    /// Honors `S3_ENDPOINT` for S3-compatible stores in local stacks,
    /// which also require path-style addressing.
    pub async fn from_config(config: &Config) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        let client = match &config.s3_endpoint {
            Some(endpoint) => {
                let conf = aws_sdk_s3::config::Builder::from(&shared)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                S3Client::from_conf(conf)
            }
            None => S3Client::new(&shared),
        };

        Self {
            client,
            bucket: config.s3_bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn presign_upload(&self, key: &str, content_type: &str) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(UPLOAD_URL_TTL_SECONDS))
            .map_err(|e| AppError::storage(e.to_string()))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::storage(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn presign_download(&self, key: &str) -> AppResult<String> {
        let presigning =
            PresigningConfig::expires_in(Duration::from_secs(DOWNLOAD_URL_TTL_SECONDS))
                .map_err(|e| AppError::storage(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::storage(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::storage(e.to_string()))?;

        Ok(())
    }
}
