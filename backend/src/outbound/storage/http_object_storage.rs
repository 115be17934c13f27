//! HTTP object-store adapter.
//!
//! PUTs image bytes to `<base_url>/<key>` and returns that URL as the
//! public address. Works against any S3-compatible or static-file PUT
//! endpoint fronted by a CDN.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::domain::ports::{ImageUpload, ObjectStorage, StorageError};

use super::object_key;

/// Object storage over a plain HTTP PUT endpoint.
#[derive(Clone)]
pub struct HttpObjectStorage {
    client: Client,
    base_url: Url,
}

impl HttpObjectStorage {
    /// Create an adapter targeting the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, folder: &str, image: &ImageUpload) -> Result<String, StorageError> {
        let key = object_key(folder, image);
        let target = self
            .base_url
            .join(&key)
            .map_err(|err| StorageError::upload(format!("invalid object URL: {err}")))?;

        let response = self
            .client
            .put(target.clone())
            .header("content-type", image.content_type.as_str())
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(|err| StorageError::upload(err.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::upload(format!(
                "storage responded with status {}",
                response.status()
            )));
        }

        debug!(key = %key, "image published");
        Ok(target.into())
    }
}
