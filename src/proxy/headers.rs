//! Header utilities for upstream requests
//!
//! Client headers are never forwarded; upstream requests carry only the
//! headers built here.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{AppError, AppResult};

/// Headers for a JSON POST without credentials (native API uses a query key)
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Headers for a JSON POST authenticated with a bearer token
///
/// The authorization value is marked sensitive so it is omitted from
/// `Debug` output of the header map.
pub fn bearer_json_headers(api_key: &SecretString) -> AppResult<HeaderMap> {
    let mut headers = json_headers();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
        .map_err(|_| {
            AppError::Internal(anyhow::anyhow!("API key contains invalid header characters"))
        })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(headers)
}
