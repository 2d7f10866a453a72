use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream};
use bytes::Bytes;

use crate::error::{AppError, Result};

/// Handle to an object that has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<StoredObject>;

    /// Public download URL for an object written by [`ObjectStorage::put`].
    async fn public_url(&self, object: &StoredObject) -> Result<String>;

    async fn delete(&self, key: &str) -> Result<()>;
}

pub struct S3ObjectStorage {
    client: s3::Client,
    bucket: String,
    assets_url: String,
}

impl S3ObjectStorage {
    pub fn new(client: s3::Client, bucket: impl Into<String>, assets_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            assets_url: assets_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<StoredObject> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::UploadError(format!("Failed to upload {}: {}", key, DisplayErrorContext(&e)))
            })?;

        tracing::debug!(bucket = %self.bucket, key, "Object uploaded");

        Ok(StoredObject {
            key: key.to_string(),
        })
    }

    async fn public_url(&self, object: &StoredObject) -> Result<String> {
        Ok(format!("{}/{}", self.assets_url, object.key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::UploadError(format!("Failed to delete {}: {}", key, DisplayErrorContext(&e)))
            })?;

        Ok(())
    }
}
