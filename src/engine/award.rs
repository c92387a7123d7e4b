//! Award engine: turns finished matches into points, exactly once.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::outcome::resolve_outcome;
use crate::{
    provider::MatchProvider,
    storage::{MatchSnapshot, PickDatabase, Prediction},
    MatchId, Result, UserId,
};


/// A provider error hit while resolving one prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AwardFailure {
    pub match_id: MatchId,
    pub message: String,
}

/// What one award pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AwardSummary {
    /// Predictions this pass moved to awarded.
    pub updated: usize,
    pub points_awarded: u32,
    /// Undetermined, unknown to the provider, or awarded concurrently.
    pub skipped: usize,
    pub failures: Vec<AwardFailure>,
}

impl AwardSummary {
    pub fn merge(&mut self, other: &AwardSummary) {
        self.updated += other.updated;
        self.points_awarded += other.points_awarded;
        self.skipped += other.skipped;
        self.failures.extend(other.failures.iter().cloned());
    }
}

enum Step {
    Awarded(u32),
    Skipped,
}

/// Award every pending prediction of `user_id` whose match has finished.
///
/// Provider failures are collected per prediction and the pass carries on.
/// A rejected credential or a store failure ends the pass with an error;
/// awards already committed stay committed. Running the pass again, or concurrently, never awards a
/// prediction twice.
pub async fn award_pending_for_user(
    db: &mut PickDatabase,
    provider: &dyn MatchProvider,
    user_id: &UserId,
) -> Result<AwardSummary> {
    let pending = db.pending_predictions_for_user(user_id)?;
    debug!(user = %user_id, pending = pending.len(), "starting award pass");

    let mut summary = AwardSummary::default();
    for prediction in &pending {
        match award_one(db, provider, prediction).await {
            Ok(Step::Awarded(points)) => {
                summary.updated += 1;
                summary.points_awarded += points;
            }
            Ok(Step::Skipped) => summary.skipped += 1,
            // Every later lookup would be refused too
            Err(AwardError::Provider(e)) if e.is_auth() => {
                warn!(user = %user_id, error = %e, "match provider refused credentials");
                return Err(e);
            }
            Err(AwardError::Provider(e)) => {
                warn!(
                    user = %user_id,
                    match_id = %prediction.match_id,
                    error = %e,
                    "match lookup failed, leaving prediction pending"
                );
                summary.failures.push(AwardFailure {
                    match_id: prediction.match_id,
                    message: e.to_string(),
                });
            }
            Err(AwardError::Store(e)) => return Err(e),
        }
    }

    info!(
        user = %user_id,
        updated = summary.updated,
        points = summary.points_awarded,
        skipped = summary.skipped,
        failures = summary.failures.len(),
        "award pass finished"
    );
    Ok(summary)
}

/// Run [`award_pending_for_user`] for every user holding pending predictions.
///
/// Users are processed independently in id order; a store failure aborts the
/// sweep.
pub async fn award_pending_for_all(
    db: &mut PickDatabase,
    provider: &dyn MatchProvider,
) -> Result<BTreeMap<UserId, AwardSummary>> {
    let users = db.users_with_pending_predictions()?;
    info!(users = users.len(), "starting award sweep");

    let mut results = BTreeMap::new();
    for user_id in users {
        let summary = award_pending_for_user(db, provider, &user_id).await?;
        results.insert(user_id, summary);
    }
    Ok(results)
}

enum AwardError {
    Provider(crate::PickemError),
    Store(crate::PickemError),
}

async fn award_one(
    db: &mut PickDatabase,
    provider: &dyn MatchProvider,
    prediction: &Prediction,
) -> std::result::Result<Step, AwardError> {
    let found = provider
        .get_match(prediction.match_id)
        .await
        .map_err(AwardError::Provider)?;

    let Some(m) = found else {
        debug!(match_id = %prediction.match_id, "no data for match");
        return Ok(Step::Skipped);
    };

    let outcome = resolve_outcome(&m);
    let Some(winning) = outcome.winning_pick() else {
        debug!(match_id = %m.id, status = m.status.code(), "match undetermined");
        return Ok(Step::Skipped);
    };

    let points = u32::from(winning == prediction.pick);
    let transitioned = db
        .award_prediction(
            prediction.match_id,
            &prediction.user_id,
            prediction.pick,
            points,
            &MatchSnapshot::final_result(&m),
            Utc::now(),
        )
        .map_err(|e| AwardError::Store(e.into()))?;

    if transitioned {
        debug!(
            user = %prediction.user_id,
            match_id = %m.id,
            pick = %prediction.pick,
            outcome = %outcome,
            points,
            "prediction awarded"
        );
        Ok(Step::Awarded(points))
    } else {
        // Another pass got there first, or the pick changed since it was read
        Ok(Step::Skipped)
    }
}
