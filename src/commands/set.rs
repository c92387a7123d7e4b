//! Write commands: users, weeks and picks

use chrono::{DateTime, NaiveDate, Utc};

use super::CommandContext;
use crate::{
    engine::{submit_prediction, Submission},
    error::PickemError,
    storage::Week,
    MatchId, Pick, Result, UserId, WeekId,
};

/// Parameters for the set week command
#[derive(Debug)]
pub struct WeekParams {
    pub id: Option<WeekId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub matches: Vec<MatchId>,
    pub deadline: Option<String>,
    pub force_open: bool,
}

impl WeekParams {
    /// Explicit id, or one derived from the date range.
    pub fn resolve_week_id(&self) -> Result<WeekId> {
        match (&self.id, self.from, self.to) {
            (Some(id), _, _) => Ok(id.clone()),
            (None, Some(from), Some(to)) if from <= to => Ok(WeekId::from_range(from, to)),
            (None, Some(from), Some(to)) => Err(PickemError::InvalidConfig {
                message: format!("week range ends ({}) before it starts ({})", to, from),
            }),
            _ => Err(PickemError::InvalidConfig {
                message: "pass --id or both --from and --to".to_string(),
            }),
        }
    }

    pub fn into_week(self) -> Result<Week> {
        let week_id = self.resolve_week_id()?;
        let deadline = match self.deadline.as_deref() {
            Some(raw) => Some(DateTime::parse_from_rfc3339(raw.trim())?.with_timezone(&Utc)),
            None => None,
        };
        let week = Week {
            week_id,
            match_ids: self.matches,
            deadline,
            force_open: self.force_open,
        };
        week.validate()?;
        Ok(week)
    }
}

/// Handle the set user command
pub fn handle_set_user(ctx: &mut CommandContext, user_id: UserId, name: String) -> Result<()> {
    ctx.db.upsert_user(&user_id, name.trim())?;
    println!("✓ User {} saved", user_id); // tarpaulin::skip
    Ok(())
}

/// Handle the set week command
pub fn handle_set_week(ctx: &mut CommandContext, params: WeekParams) -> Result<()> {
    let week = params.into_week()?;
    ctx.db.upsert_week(&week)?;
    println!(
        "✓ Week {} saved with {} matches",
        week.week_id,
        week.match_ids.len()
    ); // tarpaulin::skip
    Ok(())
}

/// Handle the set pick command
pub async fn handle_set_pick(
    ctx: &mut CommandContext,
    week_id: WeekId,
    user_id: UserId,
    match_id: MatchId,
    pick: Pick,
) -> Result<()> {
    let gate = ctx.gate();
    let cache = ctx.cache();
    let (db, provider) = ctx.db_and_provider()?;

    let submission = Submission {
        week_id,
        user_id,
        match_id,
        pick,
    };
    let stored = submit_prediction(db, provider, &gate, &cache, &submission).await?;

    println!(
        "✓ {} picked {} for {} ({} vs {})",
        stored.user_id,
        stored.pick,
        stored.match_id,
        stored.snapshot.home_team,
        stored.snapshot.away_team
    ); // tarpaulin::skip
    Ok(())
}
