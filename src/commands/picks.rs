//! Picks command implementation

use serde::Serialize;

use super::CommandContext;
use crate::{
    error::PickemError,
    storage::{PickDatabase, Prediction, User},
    Result, UserId, WeekId,
};

#[derive(Debug, Serialize)]
pub struct UserPicks {
    pub user: User,
    pub week_id: WeekId,
    pub predictions: Vec<Prediction>,
}

/// One user's predictions for one week, awarded or not.
pub fn load_user_picks(db: &PickDatabase, user_id: &UserId, week_id: &WeekId) -> Result<UserPicks> {
    let user = db
        .get_user(user_id)?
        .ok_or_else(|| PickemError::UserNotFound {
            user_id: user_id.to_string(),
        })?;
    if db.get_week(week_id)?.is_none() {
        return Err(PickemError::WeekNotFound {
            week_id: week_id.to_string(),
        });
    }

    let predictions = db.predictions_for_user_in_week(user_id, week_id)?;
    Ok(UserPicks {
        user,
        week_id: week_id.clone(),
        predictions,
    })
}

pub fn format_pick_line(p: &Prediction) -> String {
    let fixture = format!(
        "{} {} vs {}",
        p.match_id, p.snapshot.home_team, p.snapshot.away_team
    );
    let score = match (p.snapshot.home_goals, p.snapshot.away_goals) {
        (Some(h), Some(a)) => format!(" {}-{}", h, a),
        _ => String::new(),
    };
    if p.awarded {
        format!("{}{}: {} ({} pts)", fixture, score, p.pick, p.points)
    } else {
        format!("{}: {} (pending)", fixture, p.pick)
    }
}

/// Handle the user picks command
pub fn handle_user_picks(
    ctx: &CommandContext,
    week_id: WeekId,
    user_id: UserId,
    as_json: bool,
) -> Result<()> {
    let picks = load_user_picks(&ctx.db, &user_id, &week_id)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&picks)?); // tarpaulin::skip
        return Ok(());
    }

    // tarpaulin::skip - console output
    println!("{} ({}), week {}", picks.user.display_name, user_id, week_id);
    if picks.predictions.is_empty() {
        println!("  No picks");
    }
    for p in &picks.predictions {
        println!("  {}", format_pick_line(p));
    }
    Ok(())
}
