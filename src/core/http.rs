//! HTTP utilities for match-provider communication

use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

/// Header the provider expects the API key in.
pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Build provider headers from an explicit key.
pub fn api_key_header_map(api_key: &str) -> Result<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    h.insert(
        HeaderName::from_static(API_KEY_HEADER),
        HeaderValue::from_str(api_key.trim())?,
    );
    Ok(h)
}
