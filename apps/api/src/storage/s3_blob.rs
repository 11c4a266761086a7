//! S3-compatible blob store (AWS S3 or MinIO).
//!
//! Objects live at `<prefix>/<id>` in one bucket, stored with the document's MIME type.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use crate::storage::{BlobStore, ResumeId, StoreError};

#[derive(Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    fn key(&self, id: &ResumeId) -> String {
        object_key(&self.prefix, id)
    }
}

fn object_key(prefix: &str, id: &ResumeId) -> String {
    format!("{prefix}/{id}")
}

fn s3_failure<E>(operation: &'static str, err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::failure(operation, DisplayErrorContext(err).to_string())
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, id: &ResumeId, data: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.key(id))
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| s3_failure("blob.put", e))?;
        Ok(())
    }

    async fn get(&self, id: &ResumeId) -> Result<Option<Bytes>, StoreError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.key(id))
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return Ok(None);
                }
                return Err(s3_failure("blob.get", service_error));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| s3_failure("blob.get", e))?
            .into_bytes();
        Ok(Some(data))
    }

    async fn delete(&self, id: &ResumeId) -> Result<(), StoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(self.key(id))
            .send()
            .await
            .map_err(|e| s3_failure("blob.delete", e))?;
        Ok(())
    }

    async fn exists(&self, id: &ResumeId) -> Result<bool, StoreError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.key(id))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(s3_failure("blob.exists", service_error))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        let id = ResumeId::parse("resume_1_abc").unwrap();
        assert_eq!(object_key("resumes", &id), "resumes/resume_1_abc");
    }
}
