//! Match provider backed by a JSON fixtures file.

use async_trait::async_trait;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};

use super::{
    types::{FixturesEnvelope, Match},
    MatchProvider,
};
use crate::{error::PickemError, MatchId, Result};

/// Accepts both a plain list of matches and a saved provider response.
///
/// `Direct` must come first: serde lets a struct deserialize from a sequence,
/// so a short list could otherwise be read as an envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Direct(Vec<Match>),
    Envelope(FixturesEnvelope),
}

#[derive(Debug, Clone, Default)]
pub struct StaticMatchProvider {
    matches: BTreeMap<MatchId, Match>,
}

impl StaticMatchProvider {
    pub fn from_matches(matches: impl IntoIterator<Item = Match>) -> Self {
        Self {
            matches: matches.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let matches = match serde_json::from_str::<FixtureFile>(json)? {
            FixtureFile::Envelope(envelope) => envelope.into_matches()?,
            FixtureFile::Direct(matches) => matches,
        };
        Ok(Self::from_matches(matches))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PickemError::DataUnavailable {
            message: format!("cannot read fixtures file {}: {}", path.display(), e),
        })?;
        let provider = Self::from_json(&contents)?;
        tracing::debug!(
            path = %path.display(),
            matches = provider.len(),
            "loaded static fixtures"
        );
        Ok(provider)
    }

    /// Insert or replace a match (e.g. after a score update).
    pub fn upsert(&mut self, m: Match) {
        self.matches.insert(m.id, m);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[async_trait]
impl MatchProvider for StaticMatchProvider {
    async fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        Ok(self.matches.get(&id).cloned())
    }

    async fn get_matches_by_ids(&self, ids: &[MatchId]) -> Result<Vec<Match>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.matches.get(id).cloned())
            .collect())
    }
}
