//! Data models for the storage layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PickemError, Result};
use crate::provider::Match;
use crate::{MatchId, Pick, UserId, WeekId};

/// Upper bound on matches curated into one week.
pub const MAX_MATCHES_PER_WEEK: usize = 10;

/// A player of the pick'em game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub display_name: String,
    /// Sum of every awarded prediction's points, kept incrementally.
    pub points: i64,
}

/// A curated group of matches sharing one submission deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub week_id: WeekId,
    /// Display order as curated.
    pub match_ids: Vec<MatchId>,
    /// Replaces the kickoff-derived close instant when set.
    pub deadline: Option<DateTime<Utc>>,
    /// Keeps the gate open regardless of timing.
    pub force_open: bool,
}

impl Week {
    pub fn new(week_id: WeekId, match_ids: Vec<MatchId>) -> Self {
        Self {
            week_id,
            match_ids,
            deadline: None,
            force_open: false,
        }
    }

    pub fn contains(&self, match_id: MatchId) -> bool {
        self.match_ids.contains(&match_id)
    }

    /// At most [`MAX_MATCHES_PER_WEEK`] matches, no repeats.
    pub fn validate(&self) -> Result<()> {
        if self.match_ids.len() > MAX_MATCHES_PER_WEEK {
            return Err(PickemError::TooManyMatches {
                count: self.match_ids.len(),
                max: MAX_MATCHES_PER_WEEK,
            });
        }
        let mut seen = self.match_ids.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.match_ids.len() {
            return Err(PickemError::InvalidConfig {
                message: format!("week {} lists a match twice", self.week_id),
            });
        }
        Ok(())
    }
}

/// Denormalized match details carried on a prediction for historical display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub home_team: String,
    pub away_team: String,
    pub league: Option<String>,
    pub match_date: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub status: Option<String>,
}

impl MatchSnapshot {
    /// Snapshot taken at submission: teams, league, date.
    pub fn at_submission(m: &Match) -> Self {
        Self {
            home_team: m.home_team.name.clone(),
            away_team: m.away_team.name.clone(),
            league: m.league.clone(),
            match_date: m.kickoff.clone(),
            home_goals: None,
            away_goals: None,
            status: None,
        }
    }

    /// Snapshot taken at award time, including the final score.
    pub fn final_result(m: &Match) -> Self {
        Self {
            home_goals: m.home_goals,
            away_goals: m.away_goals,
            status: Some(m.status.code().to_string()),
            ..Self::at_submission(m)
        }
    }
}

/// One user's pick for one match. Keyed by (match_id, user_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub match_id: MatchId,
    pub user_id: UserId,
    pub week_id: WeekId,
    pub pick: Pick,
    pub awarded: bool,
    pub points: u32,
    pub snapshot: MatchSnapshot,
    /// Unix seconds, server clock
    pub created_at: i64,
    pub updated_at: i64,
}

impl Prediction {
    /// A fresh, unawarded prediction stamped with `now`.
    pub fn pending(
        match_id: MatchId,
        user_id: UserId,
        week_id: WeekId,
        pick: Pick,
        snapshot: MatchSnapshot,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            match_id,
            user_id,
            week_id,
            pick,
            awarded: false,
            points: 0,
            snapshot,
            created_at: now.timestamp(),
            updated_at: now.timestamp(),
        }
    }
}

/// The slice of a prediction the ranking aggregator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSnapshot {
    pub pick: Pick,
    pub awarded: bool,
    pub points: u32,
}

impl From<&Prediction> for PredictionSnapshot {
    fn from(p: &Prediction) -> Self {
        Self {
            pick: p.pick,
            awarded: p.awarded,
            points: p.points,
        }
    }
}
