//! HTTP client for an API-Football style `/fixtures` endpoint.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, StatusCode};

use super::{
    types::{FixturesEnvelope, Match},
    MatchProvider,
};
use crate::{error::PickemError, MatchId, Result};

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

/// The provider rejects `ids=` lists longer than this.
pub const MAX_IDS_PER_REQUEST: usize = 20;

pub struct HttpMatchProvider {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpMatchProvider {
    pub fn new(base_url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers,
        }
    }

    pub fn fixtures_url(&self) -> String {
        format!("{}/fixtures", self.base_url)
    }

    async fn fetch_fixtures(&self, params: &[(&str, String)]) -> Result<Vec<Match>> {
        let res = self
            .client
            .get(self.fixtures_url())
            .headers(self.headers.clone())
            .query(params)
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PickemError::Unauthorized {
                message: format!("provider returned {}", status),
            });
        }
        if !status.is_success() {
            return Err(PickemError::DataUnavailable {
                message: format!("provider returned {}", status),
            });
        }

        res.json::<FixturesEnvelope>().await?.into_matches()
    }
}

/// `ids=1-2-3` parameter values, at most [`MAX_IDS_PER_REQUEST`] per chunk.
pub fn ids_param_chunks(ids: &[MatchId]) -> Vec<String> {
    ids.chunks(MAX_IDS_PER_REQUEST)
        .map(|chunk| {
            chunk
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect()
}

#[async_trait]
impl MatchProvider for HttpMatchProvider {
    async fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        let matches = self.fetch_fixtures(&[("id", id.to_string())]).await?;
        Ok(matches.into_iter().find(|m| m.id == id))
    }

    async fn get_matches_by_ids(&self, ids: &[MatchId]) -> Result<Vec<Match>> {
        let mut out = Vec::with_capacity(ids.len());
        for chunk in ids_param_chunks(ids) {
            out.extend(self.fetch_fixtures(&[("ids", chunk)]).await?);
        }
        Ok(out)
    }
}
