//! Per-week cache of everyone's predictions and the week's fixtures.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{
    config::{PickemConfig, DEFAULT_CACHE_TTL_SECS, DEFAULT_READ_TIMEOUT_SECS},
    core::{ExpiringCache, FixturesCacheKey, PredictionsCacheKey},
    provider::{Match, MatchProvider},
    storage::{PickDatabase, PredictionSnapshot},
    MatchId, Result, UserId, WeekId,
};

/// match -> user -> prediction, for one week.
pub type WeekPredictions = BTreeMap<MatchId, BTreeMap<UserId, PredictionSnapshot>>;

/// Weeks kept in memory at once.
const WEEK_CAPACITY: usize = 16;

pub struct PredictionCache {
    predictions: ExpiringCache<PredictionsCacheKey, Arc<WeekPredictions>>,
    fixtures: ExpiringCache<FixturesCacheKey, Arc<Vec<Match>>>,
    focused: Mutex<Option<WeekId>>,
    read_timeout: Duration,
}

impl Default for PredictionCache {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        )
    }
}

impl PredictionCache {
    pub fn new(ttl: Duration, read_timeout: Duration) -> Self {
        Self {
            predictions: ExpiringCache::new(WEEK_CAPACITY, ttl),
            fixtures: ExpiringCache::new(WEEK_CAPACITY, ttl),
            focused: Mutex::new(None),
            read_timeout,
        }
    }

    pub fn from_config(config: &PickemConfig) -> Self {
        Self::new(config.cache_ttl, config.read_timeout)
    }

    pub fn get_predictions_for_week(
        &self,
        db: &PickDatabase,
        week_id: &WeekId,
        match_ids: &[MatchId],
    ) -> Result<Arc<WeekPredictions>> {
        self.get_predictions_for_week_at(db, week_id, match_ids, Instant::now())
    }

    /// Cached prediction map for a week, filled with one read per match on a
    /// miss.
    pub fn get_predictions_for_week_at(
        &self,
        db: &PickDatabase,
        week_id: &WeekId,
        match_ids: &[MatchId],
        now: Instant,
    ) -> Result<Arc<WeekPredictions>> {
        let key = PredictionsCacheKey {
            week_id: week_id.clone(),
        };
        if let Some(hit) = self.predictions.get_at(&key, now) {
            debug!(week = %week_id, "prediction cache hit");
            return Ok(hit);
        }

        debug!(week = %week_id, matches = match_ids.len(), "prediction cache miss, filling");
        let mut map = WeekPredictions::new();
        for &match_id in match_ids {
            let by_user = db
                .predictions_for_match(match_id)?
                .iter()
                .map(|p| (p.user_id.clone(), PredictionSnapshot::from(p)))
                .collect();
            map.insert(match_id, by_user);
        }

        let map = Arc::new(map);
        self.predictions.insert_at(key, Arc::clone(&map), now);
        Ok(map)
    }

    pub async fn fixtures_for_week(
        &self,
        provider: &dyn MatchProvider,
        week_id: &WeekId,
        match_ids: &[MatchId],
    ) -> Arc<Vec<Match>> {
        self.fixtures_for_week_at(provider, week_id, match_ids, Instant::now())
            .await
    }

    /// Cached fixture list for a week.
    ///
    /// The provider read runs under the read timeout. A timeout or provider
    /// error yields an empty list, which is not cached.
    pub async fn fixtures_for_week_at(
        &self,
        provider: &dyn MatchProvider,
        week_id: &WeekId,
        match_ids: &[MatchId],
        now: Instant,
    ) -> Arc<Vec<Match>> {
        let key = FixturesCacheKey {
            week_id: week_id.clone(),
        };
        if let Some(hit) = self.fixtures.get_at(&key, now) {
            debug!(week = %week_id, "fixtures cache hit");
            return hit;
        }
        if match_ids.is_empty() {
            return Arc::new(Vec::new());
        }

        let read = tokio::time::timeout(self.read_timeout, provider.get_matches_by_ids(match_ids));
        match read.await {
            Ok(Ok(mut matches)) => {
                // Keep the week's curated order
                matches.sort_by_key(|m| {
                    match_ids
                        .iter()
                        .position(|id| *id == m.id)
                        .unwrap_or(usize::MAX)
                });
                let matches = Arc::new(matches);
                self.fixtures.insert_at(key, Arc::clone(&matches), now);
                matches
            }
            Ok(Err(e)) => {
                warn!(week = %week_id, error = %e, "fixture read failed");
                Arc::new(Vec::new())
            }
            Err(_) => {
                warn!(
                    week = %week_id,
                    timeout_ms = self.read_timeout.as_millis() as u64,
                    "fixture read timed out"
                );
                Arc::new(Vec::new())
            }
        }
    }

    /// Make `week_id` the focused week, dropping the previous one's entries.
    pub fn focus_week(&self, week_id: &WeekId) {
        let mut focused = self
            .focused
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = focused.as_ref() {
            if previous != week_id {
                debug!(from = %previous, to = %week_id, "switching focused week");
                self.invalidate(previous);
            }
        }
        *focused = Some(week_id.clone());
    }

    pub fn focused_week(&self) -> Option<WeekId> {
        self.focused
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drop both cached entries for one week.
    pub fn invalidate(&self, week_id: &WeekId) {
        self.predictions.invalidate(&PredictionsCacheKey {
            week_id: week_id.clone(),
        });
        self.fixtures.invalidate(&FixturesCacheKey {
            week_id: week_id.clone(),
        });
    }

    pub fn clear(&self) {
        self.predictions.clear();
        self.fixtures.clear();
    }
}
