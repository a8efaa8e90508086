// S3 object store backed by rust-s3

use async_trait::async_trait;
use bytes::Bytes;
use s3::{creds::Credentials, Bucket, Region};
use tracing::{debug, info};

use super::{validate_key, ObjectStore, StorageError, StorageResult};
use crate::config::StorageConfig;

pub struct S3ObjectStore {
    bucket: Bucket,
    public_base: String,
}

impl S3ObjectStore {
    /// Build a client for the configured bucket.
    ///
    /// With no `S3_ENDPOINT` the bucket is addressed virtual-host style on AWS and
    /// public URLs take the form `https://<bucket>.s3.<region>.amazonaws.com/<key>`.
    /// A custom endpoint (MinIO, LocalStack) switches to path-style addressing and
    /// URLs of the form `<endpoint>/<bucket>/<key>`.
    pub fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        if config.s3_bucket.trim().is_empty() {
            return Err(StorageError::Config("S3 bucket name is empty".to_string()));
        }

        let credentials = if config.s3_access_key_id.is_empty() {
            Credentials::anonymous()
        } else {
            Credentials::new(
                Some(config.s3_access_key_id.as_str()),
                Some(config.s3_secret_access_key.as_str()),
                None,
                None,
                None,
            )
        }
        .map_err(|e| StorageError::Config(format!("invalid S3 credentials: {}", e)))?;

        let (bucket, public_base) = match &config.s3_endpoint {
            Some(endpoint) => {
                let endpoint = endpoint.trim_end_matches('/').to_string();
                let region = Region::Custom {
                    region: config.s3_region.clone(),
                    endpoint: endpoint.clone(),
                };
                let bucket = Bucket::new(&config.s3_bucket, region, credentials)
                    .map_err(|e| StorageError::Config(e.to_string()))?
                    .with_path_style();
                (bucket, format!("{}/{}", endpoint, config.s3_bucket))
            }
            None => {
                let region: Region = config
                    .s3_region
                    .parse()
                    .map_err(|e| StorageError::Config(format!("invalid region: {}", e)))?;
                let bucket = Bucket::new(&config.s3_bucket, region, credentials)
                    .map_err(|e| StorageError::Config(e.to_string()))?;
                (
                    bucket,
                    format!(
                        "https://{}.s3.{}.amazonaws.com",
                        config.s3_bucket, config.s3_region
                    ),
                )
            }
        };

        info!(bucket = %config.s3_bucket, region = %config.s3_region, "S3 object store configured");
        Ok(Self { bucket, public_base })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        validate_key(key)?;
        debug!(key, size = data.len(), content_type, "Uploading object");

        let response = self
            .bucket
            .put_object_with_content_type(format!("/{}", key), &data, content_type)
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Upload {
                key: key.to_string(),
                reason: format!("unexpected status {}", status),
            });
        }
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;

        let response = self
            .bucket
            .delete_object(format!("/{}", key))
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Delete {
                key: key.to_string(),
                reason: format!("unexpected status {}", status),
            });
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }

    fn provider(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageProvider;
    use std::path::PathBuf;

    fn storage_config(endpoint: Option<String>) -> StorageConfig {
        StorageConfig {
            provider: StorageProvider::S3,
            s3_bucket: "petpost-images".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_access_key_id: "AKIDEXAMPLE".to_string(),
            s3_secret_access_key: "secret".to_string(),
            s3_endpoint: endpoint,
            upload_dir: PathBuf::from("unused"),
            public_base_url: "http://unused".to_string(),
        }
    }

    #[test]
    fn test_aws_public_url() {
        let mut config = storage_config(None);
        config.s3_region = "eu-west-1".to_string();
        let store = S3ObjectStore::from_config(&config).unwrap();
        assert_eq!(
            store.public_url("abc.jpg"),
            "https://petpost-images.s3.eu-west-1.amazonaws.com/abc.jpg"
        );
    }

    #[test]
    fn test_custom_endpoint_public_url() {
        let store =
            S3ObjectStore::from_config(&storage_config(Some("http://minio.local:9000/".into())))
                .unwrap();
        assert_eq!(
            store.public_url("abc.png"),
            "http://minio.local:9000/petpost-images/abc.png"
        );
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let mut config = storage_config(None);
        config.s3_bucket = "  ".to_string();
        assert!(matches!(
            S3ObjectStore::from_config(&config),
            Err(StorageError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_put_object_sends_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/petpost-images/photo.jpg")
            .match_header("content-type", "image/jpeg")
            .with_status(200)
            .with_header("ETag", "\"d41d8cd98f00b204e9800998ecf8427e\"")
            .create_async()
            .await;

        let store = S3ObjectStore::from_config(&storage_config(Some(server.url()))).unwrap();
        store
            .put_object("photo.jpg", Bytes::from_static(b"jpeg-bytes"), "image/jpeg")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_object_failure_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/petpost-images/photo.jpg")
            .with_status(403)
            .with_body("AccessDenied")
            .create_async()
            .await;

        let store = S3ObjectStore::from_config(&storage_config(Some(server.url()))).unwrap();
        let result = store
            .put_object("photo.jpg", Bytes::from_static(b"jpeg-bytes"), "image/jpeg")
            .await;

        assert!(matches!(result, Err(StorageError::Upload { .. })));
    }

    #[tokio::test]
    async fn test_put_object_rejects_bad_key() {
        let store = S3ObjectStore::from_config(&storage_config(None)).unwrap();
        let result = store
            .put_object("../escape.jpg", Bytes::new(), "image/jpeg")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
