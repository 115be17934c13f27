//! In-memory object storage for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{ImageUpload, ObjectStorage, StorageError};

use super::object_key;

/// Object storage that keeps uploads in a process-local map.
#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: bool,
}

impl MemoryObjectStorage {
    /// Empty store that accepts every upload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects every upload, for failure-path tests.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_uploads: true,
        }
    }

    /// Bytes stored under the given key, if any.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(key).cloned())
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(&self, folder: &str, image: &ImageUpload) -> Result<String, StorageError> {
        if self.fail_uploads {
            return Err(StorageError::upload("memory storage configured to fail"));
        }
        let key = object_key(folder, image);
        self.objects
            .lock()
            .map_err(|_| StorageError::upload("memory storage poisoned"))?
            .insert(key.clone(), image.bytes.clone());
        Ok(format!("memory://{key}"))
    }
}

#[cfg(test)]
mod tests {
    //! Round-trip coverage.
    use super::*;

    #[tokio::test]
    async fn uploads_land_under_their_derived_key() {
        let storage = MemoryObjectStorage::new();
        let image = ImageUpload {
            bytes: vec![7, 8, 9],
            content_type: "image/png".to_owned(),
        };

        let url = storage
            .upload("profile_images", &image)
            .await
            .expect("upload succeeds");

        let key = url.strip_prefix("memory://").expect("memory url prefix");
        assert_eq!(storage.object(key), Some(vec![7, 8, 9]));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn failing_store_rejects_uploads() {
        let storage = MemoryObjectStorage::failing();
        let image = ImageUpload {
            bytes: vec![1],
            content_type: "image/png".to_owned(),
        };

        storage
            .upload("profile_images", &image)
            .await
            .expect_err("configured failure");
        assert!(storage.is_empty());
    }
}
