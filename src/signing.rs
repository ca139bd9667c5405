// Request signing
// Every request carries the API key and a SHA-256 signature of
// key + secret + unix timestamp.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::ApiError;

pub const API_KEY_HEADER: &str = "api-key";
pub const SIGNATURE_HEADER: &str = "x-signature";

const JSON: &str = "application/json";

/// API key and secret pair.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Credentials {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn sign(&self, unix_ts: i64) -> String {
        signature(&self.api_key, &self.api_secret, unix_ts)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// Lowercase hex SHA-256 of `api_key + api_secret + unix_ts`.
pub fn signature(api_key: &str, api_secret: &str, unix_ts: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(api_secret.as_bytes());
    hasher.update(unix_ts.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Builds the header set for one attempt. Configured defaults are applied
/// first so they can never replace the authentication headers.
pub fn build_headers(
    credentials: &Credentials,
    defaults: &HeaderMap,
    unix_ts: i64,
) -> Result<HeaderMap, ApiError> {
    let mut headers = defaults.clone();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));

    let api_key = HeaderValue::from_str(&credentials.api_key)
        .map_err(|e| ApiError::ClientError(format!("invalid api key header: {}", e)))?;
    headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

    let signature = HeaderValue::from_str(&credentials.sign(unix_ts))
        .map_err(|e| ApiError::ClientError(format!("invalid signature header: {}", e)))?;
    headers.insert(HeaderName::from_static(SIGNATURE_HEADER), signature);

    Ok(headers)
}
