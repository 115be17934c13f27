//! Success response envelope.
//!
//! Every endpoint answers `{"status": "success", "message": ..., "data"?:
//! ...}`; feed responses additionally carry a `pagination` object.

use pagination::PageInfo;
use serde::Serialize;

/// Success envelope wrapping a response payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Always `"success"`; errors render through `ApiError` instead.
    status: &'static str,
    /// Human-readable outcome description.
    message: String,
    /// Endpoint payload, omitted for message-only responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    /// Pagination metadata, present on feed responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PageInfo>,
}

impl Envelope<()> {
    /// Envelope with a message and no payload.
    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: None,
            pagination: None,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Envelope with a message and payload.
    #[must_use]
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
            pagination: None,
        }
    }

    /// Envelope with a message, payload, and pagination metadata.
    #[must_use]
    pub fn paginated(message: impl Into<String>, data: T, pagination: PageInfo) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
            pagination: Some(pagination),
        }
    }
}
