//! Server-side prediction submission.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{gate::AdmissionGate, prediction_cache::PredictionCache};
use crate::{
    error::PickemError,
    provider::MatchProvider,
    storage::{MatchSnapshot, PickDatabase, Prediction},
    MatchId, Pick, Result, UserId, WeekId,
};

/// A user's pick as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub week_id: WeekId,
    pub user_id: UserId,
    pub match_id: MatchId,
    pub pick: Pick,
}

/// Store a pick if the week's gate is open by the server clock.
///
/// A repeat pick for the same match overwrites the earlier one. The week's
/// cached predictions are dropped so rankings see the change.
pub async fn submit_prediction(
    db: &mut PickDatabase,
    provider: &dyn MatchProvider,
    gate: &AdmissionGate,
    cache: &PredictionCache,
    submission: &Submission,
) -> Result<Prediction> {
    submit_prediction_at(db, provider, gate, cache, submission, Utc::now()).await
}

pub(crate) async fn submit_prediction_at(
    db: &mut PickDatabase,
    provider: &dyn MatchProvider,
    gate: &AdmissionGate,
    cache: &PredictionCache,
    submission: &Submission,
    now: DateTime<Utc>,
) -> Result<Prediction> {
    let Submission {
        week_id,
        user_id,
        match_id,
        pick,
    } = submission;

    let week = db
        .get_week(week_id)?
        .ok_or_else(|| PickemError::WeekNotFound {
            week_id: week_id.to_string(),
        })?;
    if !week.contains(*match_id) {
        return Err(PickemError::MatchNotInWeek {
            match_id: match_id.as_u64(),
            week_id: week_id.to_string(),
        });
    }

    let fixtures = provider.get_matches_by_ids(&week.match_ids).await?;
    if !gate.can_submit(&week, &fixtures, now) {
        warn!(week = %week_id, user = %user_id, match_id = %match_id, "pick rejected, gate closed");
        return Err(PickemError::PicksClosed {
            week_id: week_id.to_string(),
        });
    }

    let fixture = fixtures
        .iter()
        .find(|m| m.id == *match_id)
        .ok_or_else(|| PickemError::DataUnavailable {
            message: format!("match {} not found at provider", match_id),
        })?;

    db.ensure_user(user_id)?;
    let prediction = Prediction::pending(
        *match_id,
        user_id.clone(),
        week_id.clone(),
        *pick,
        MatchSnapshot::at_submission(fixture),
        now,
    );
    if !db.upsert_prediction(&prediction)? {
        // Already awarded; the pick is frozen
        return Err(PickemError::PicksClosed {
            week_id: week_id.to_string(),
        });
    }
    cache.invalidate(week_id);

    info!(week = %week_id, user = %user_id, match_id = %match_id, pick = %pick, "pick stored");
    let stored = db.get_prediction(*match_id, user_id)?;
    Ok(stored.unwrap_or(prediction))
}
