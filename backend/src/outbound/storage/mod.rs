//! Object storage adapters for published images.
//!
//! Object names derive from a content digest, so re-uploading identical
//! bytes lands on the same key and a retried upload is harmless.

pub mod http_object_storage;
pub mod memory_object_storage;

pub use http_object_storage::HttpObjectStorage;
pub use memory_object_storage::MemoryObjectStorage;

use sha2::{Digest, Sha256};

use crate::domain::ports::ImageUpload;

/// Derive the storage key for an image: `<folder>/<sha256-hex>.<ext>`.
pub(crate) fn object_key(folder: &str, image: &ImageUpload) -> String {
    let digest = hex::encode(Sha256::digest(&image.bytes));
    let extension = extension_for(&image.content_type);
    format!("{folder}/{digest}.{extension}")
}

/// File extension for the accepted image MIME types; anything else is
/// stored as an opaque blob.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}
