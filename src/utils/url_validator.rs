//! Destination URL checks.
//!
//! Long URLs are stored exactly as supplied; this only rejects values that
//! cannot be redirected to safely.

use url::Url;

/// Errors that can occur while checking a long URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// Rejects `javascript:`, `data:`, `file:` and other schemes a redirect could
/// be abused with. Control characters are rejected outright: the URL parser
/// would drop them silently, leaving a stored value that cannot be sent back
/// in a `Location` header.
///
/// # Errors
///
/// Returns [`UrlValidationError`] describing the first failed rule.
pub fn validate_long_url(input: &str) -> Result<(), UrlValidationError> {
    let input = input.trim();

    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(input)
        .map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}
