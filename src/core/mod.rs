//! Core utilities for the pick'em engine
//!
//! - `cache`: expiring in-memory cache used by the prediction cache
//! - `http`: provider request headers

pub mod cache;
pub mod http;

// Re-export commonly used items for convenience
pub use cache::{CacheKey, ExpiringCache, FixturesCacheKey, PredictionsCacheKey};
pub use http::{api_key_header_map, API_KEY_HEADER};
