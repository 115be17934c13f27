//! Shared validation helpers for inbound HTTP adapters.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::domain::business::BusinessId;
use crate::domain::ports::ImageUpload;

use super::error::ApiError;

/// MIME type assumed when an image attachment does not declare one.
const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Parse a path segment into a business id, rejecting malformed input
/// before any query runs.
pub(crate) fn parse_business_id(raw: &str) -> Result<BusinessId, ApiError> {
    BusinessId::new(raw).map_err(|err| ApiError::invalid_request(err.to_string()))
}

/// Decode an optional base64 image attachment.
///
/// `image_data` carries the bytes; `image_content_type` is optional and
/// defaults to JPEG, matching what the mobile clients send.
pub(crate) fn decode_image(
    image_data: Option<String>,
    image_content_type: Option<String>,
) -> Result<Option<ImageUpload>, ApiError> {
    let Some(encoded) = image_data else {
        return Ok(None);
    };
    let bytes = BASE64
        .decode(encoded.as_bytes())
        .map_err(|_| ApiError::invalid_request("imageData must be valid base64"))?;
    if bytes.is_empty() {
        return Err(ApiError::invalid_request("imageData must not be empty"));
    }
    Ok(Some(ImageUpload {
        bytes,
        content_type: image_content_type
            .unwrap_or_else(|| DEFAULT_IMAGE_CONTENT_TYPE.to_owned()),
    }))
}
