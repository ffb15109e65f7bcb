//! AWS S3 object store.

use super::ObjectStore;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;

#[cfg(feature = "aws")]
use aws_sdk_s3::{primitives::ByteStream, Client};

/// S3 object store configuration.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket name.
    pub bucket: String,
    /// AWS region.
    pub region: Option<String>,
    /// Custom endpoint (for MinIO, LocalStack).
    pub endpoint: Option<String>,
}

impl S3Config {
    /// Creates a new S3 config.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: None,
            endpoint: None,
        }
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets a custom endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// S3-backed object store.
#[cfg(feature = "aws")]
pub struct S3Store {
    client: Client,
    config: S3Config,
}

#[cfg(feature = "aws")]
impl S3Store {
    /// Creates a new S3 store from ambient AWS credentials.
    pub async fn new(config: S3Config) -> StoreResult<Self> {
        let mut loader = aws_config::from_env();
        if let Some(ref region) = config.region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }
        let aws_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);
        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            config,
        })
    }
}

#[cfg(feature = "aws")]
#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    async fn put(&self, key: &str, data: Bytes) -> StoreResult<()> {
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err = e.to_string();
                if err.contains("NoSuchKey") || err.contains("404") {
                    StoreError::NotFound(key.to_string())
                } else {
                    StoreError::Backend(err)
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Bytes::from(data.to_vec()))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = e.to_string();
                if err.contains("404") || err.contains("NotFound") {
                    Ok(false)
                } else {
                    Err(StoreError::Backend(err))
                }
            }
        }
    }

    async fn list(&self, prefix: Option<&str>) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.config.bucket);
            if let Some(p) = prefix {
                request = request.prefix(p);
            }
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            if let Some(contents) = response.contents {
                keys.extend(contents.into_iter().filter_map(|o| o.key));
            }

            if response.is_truncated.unwrap_or(false) {
                continuation_token = response.next_continuation_token;
            } else {
                break;
            }
        }

        Ok(keys)
    }
}

/// Stub S3 store when the feature is disabled.
#[cfg(not(feature = "aws"))]
pub struct S3Store;

#[cfg(not(feature = "aws"))]
impl S3Store {
    /// Creates a new S3 store (stub).
    pub async fn new(_config: S3Config) -> StoreResult<Self> {
        Err(StoreError::Configuration(
            "S3 support not enabled. Enable the 'aws' feature.".to_string(),
        ))
    }
}
