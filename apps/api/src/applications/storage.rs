use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;

/// Blob storage for uploaded resume PDFs, keyed by object key.
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    async fn put(&self, key: &str, pdf: Bytes) -> Result<(), AppError>;

    /// `None` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, AppError>;

    /// Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Object key under which an application's resume is stored.
pub fn resume_key(application_id: uuid::Uuid) -> String {
    format!("resumes/{application_id}.pdf")
}

/// Resumes in an S3 bucket (or MinIO locally).
#[derive(Clone)]
pub struct S3ResumeStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ResumeStorage for S3ResumeStorage {
    async fn put(&self, key: &str, pdf: Bytes) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(pdf))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, AppError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => {
                let data = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::Storage(format!("S3 download failed: {e}")))?;
                Ok(Some(data.into_bytes()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(AppError::Storage(format!("S3 download failed: {service_error}")))
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        info!("Deleted resume s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// In-process resume storage.
#[derive(Default)]
pub struct MemoryResumeStorage {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryResumeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ResumeStorage for MemoryResumeStorage {
    async fn put(&self, key: &str, pdf: Bytes) -> Result<(), AppError> {
        self.objects.write().await.insert(key.to_string(), pdf);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, AppError> {
        Ok(self.objects.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}
