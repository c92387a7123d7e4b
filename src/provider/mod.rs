//! Match-data provider seam.
//!
//! The engine never talks to the outside world except through
//! [`MatchProvider`]. Two implementations ship with the crate:
//! [`http::HttpMatchProvider`] for the live API and
//! [`static_feed::StaticMatchProvider`] for fixture files and tests.

pub mod http;
pub mod static_feed;
pub mod types;

use async_trait::async_trait;

use crate::{MatchId, Result};

pub use http::HttpMatchProvider;
pub use static_feed::StaticMatchProvider;
pub use types::{Match, MatchStatus, Team};

/// Read-only access to match records, keyed by match id.
#[async_trait]
pub trait MatchProvider: Send + Sync {
    /// `Ok(None)` when the provider has no such match.
    async fn get_match(&self, id: MatchId) -> Result<Option<Match>>;

    /// Matches found among `ids`; unknown ids are silently absent.
    async fn get_matches_by_ids(&self, ids: &[MatchId]) -> Result<Vec<Match>>;
}
