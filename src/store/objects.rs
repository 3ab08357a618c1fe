use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    config::{self, Credentials},
    error::DisplayErrorContext,
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};
use std::time::Duration;
use tracing::Instrument;

use crate::configuration::StorageSettings;
use crate::error::{StoreError, StoreResult};

/// Binary asset storage keyed by film id (plus resolution suffix for variants).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> StoreResult<()>;

    /// Fails with `NotFound` when the key does not exist.
    async fn get_object(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Deleting a missing key is not an error.
    async fn delete_object(&self, key: &str) -> StoreResult<()>;

    async fn presigned_upload_url(&self, key: &str, expires_in: Duration) -> StoreResult<String>;
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

async fn get_aws_client(settings: &StorageSettings) -> Client {
    let region = Region::new(settings.region.clone());
    let mut conf_builder = match (&settings.access_key_id, &settings.secret_access_key) {
        (Some(id), Some(secret)) => {
            let cred = Credentials::new(id, secret, None, None, "loaded up from configuration");
            config::Builder::new()
                .region(region)
                .credentials_provider(cred)
                .behavior_version(BehaviorVersion::latest())
        }
        _ => {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            config::Builder::from(&shared)
        }
    };
    if let Some(endpoint) = &settings.endpoint_url {
        conf_builder = conf_builder.endpoint_url(endpoint).force_path_style(true);
    }
    Client::from_conf(conf_builder.build())
}

impl S3ObjectStore {
    pub async fn from_settings(settings: &StorageSettings) -> Self {
        let client = get_aws_client(settings).await;
        tracing::info!(bucket = %settings.bucket, "S3 object store initialized");
        S3ObjectStore {
            client,
            bucket: settings.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> StoreResult<()> {
        let span = tracing::info_span!("Uploading object", bucket = %self.bucket, %key, size = body.len());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .instrument(span)
            .await
            .map_err(|err| StoreError::ObjectStorage(DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> StoreResult<Vec<u8>> {
        let span = tracing::info_span!("Downloading object", bucket = %self.bucket, %key);
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .instrument(span)
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|service_err| service_err.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    return Err(StoreError::NotFound);
                }
                return Err(StoreError::ObjectStorage(
                    DisplayErrorContext(&err).to_string(),
                ));
            }
        };
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| StoreError::ObjectStorage(err.to_string()))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn delete_object(&self, key: &str) -> StoreResult<()> {
        let span = tracing::info_span!("Deleting object", bucket = %self.bucket, %key);
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .instrument(span)
            .await
            .map_err(|err| StoreError::ObjectStorage(DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }

    async fn presigned_upload_url(&self, key: &str, expires_in: Duration) -> StoreResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| StoreError::ObjectStorage(err.to_string()))?;
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| StoreError::ObjectStorage(DisplayErrorContext(&err).to_string()))?;
        tracing::info!(%key, "Got presigned PUT URL");
        Ok(request.uri().to_string())
    }
}
