//! DTOs for the short URL management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request to create a short URL.
///
/// `long_url` is optional at the serde level so that an absent field is
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    #[validate(
        required(message = "long_url is required"),
        length(min = 1, max = 2048, message = "long_url must be 1-2048 characters"),
        url(message = "Invalid URL format")
    )]
    pub long_url: Option<String>,
}

/// A short URL record as returned by the API.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortUrlResponse {
    pub id: i64,
    pub long_url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortUrlResponse {
    /// Builds the response body, `short_url` being `base_url/short_code`.
    pub fn from_record(record: ShortUrl, short_url: String) -> Self {
        Self {
            id: record.id,
            long_url: record.long_url,
            short_code: record.short_code,
            short_url,
            created_at: record.created_at,
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_long_url_fails_validation() {
        let request: CreateShortUrlRequest = serde_json::from_str("{}").unwrap();

        let errors = request.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("long_url"));
    }

    #[test]
    fn test_relative_url_fails_validation() {
        let request = CreateShortUrlRequest {
            long_url: Some("not-a-url".to_string()),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_valid_url_passes() {
        let request = CreateShortUrlRequest {
            long_url: Some("https://example.com/a?b=c".to_string()),
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_response_serializes_all_fields() {
        let record = ShortUrl::new(
            7,
            "alice".to_string(),
            "https://example.com".to_string(),
            "abc123".to_string(),
            Utc::now(),
        );
        let response =
            ShortUrlResponse::from_record(record, "http://localhost:3000/abc123".to_string());

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["short_code"], "abc123");
        assert_eq!(value["short_url"], "http://localhost:3000/abc123");
        assert!(value.get("created_at").is_some());
        assert!(value.get("owner").is_none());
    }
}
