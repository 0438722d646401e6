//! DTOs for the generator endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use validator::Validate;

use crate::error::AppError;

/// Request to shorten a URL.
///
/// A missing `url` field deserializes to an empty string so it fails the
/// length check with a 400 instead of an extractor rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[serde(default)]
    // Keep in sync with `MAX_URL_LENGTH`.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

impl GenerateRequest {
    /// Rejects URLs whose scheme is not `http` or `https`.
    pub fn check_scheme(&self) -> Result<(), AppError> {
        match Url::parse(&self.url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            _ => Err(AppError::bad_request(
                "URL must be an absolute http or https URL",
                json!({ "url": self.url }),
            )),
        }
    }
}

/// Body of both generator responses: the alias on create, the original URL on resolve.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub url: String,
}
