//! Leaderboard command implementations

use serde::Serialize;

use super::CommandContext;
use crate::{
    engine::{all_time_rankings, weekly_rankings, AllTimeEntry, RankingEntry},
    provider::Match,
    Result, WeekId,
};

#[derive(Debug, Serialize)]
struct WeeklyOutput<'a> {
    week_id: &'a WeekId,
    rankings: &'a [RankingEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    fixtures: Option<&'a [Match]>,
}

pub fn format_weekly_line(entry: &RankingEntry) -> String {
    format!(
        "{:>3}. {} ({}) {} pts, {} picks",
        entry.rank, entry.display_name, entry.user_id, entry.weekly_points, entry.weekly_total
    )
}

pub fn format_all_time_line(entry: &AllTimeEntry) -> String {
    format!(
        "{:>3}. {} ({}) {} pts",
        entry.rank, entry.display_name, entry.user_id, entry.points
    )
}

/// Handle the weekly rankings command
pub async fn handle_weekly_rankings(
    ctx: &mut CommandContext,
    week_id: WeekId,
    as_json: bool,
    with_fixtures: bool,
) -> Result<()> {
    let cache = ctx.cache();
    let rankings = weekly_rankings(&ctx.db, &cache, &week_id)?;

    let fixtures = if with_fixtures {
        let match_ids = ctx
            .db
            .get_week(&week_id)?
            .map(|w| w.match_ids)
            .unwrap_or_default();
        let (_, provider) = ctx.db_and_provider()?;
        Some(cache.fixtures_for_week(provider, &week_id, &match_ids).await)
    } else {
        None
    };

    if as_json {
        let output = WeeklyOutput {
            week_id: &week_id,
            rankings: &rankings,
            fixtures: fixtures.as_deref().map(|f| f.as_slice()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?); // tarpaulin::skip
        return Ok(());
    }

    // tarpaulin::skip - console output
    if let Some(fixtures) = &fixtures {
        println!("Fixtures:");
        for m in fixtures.iter() {
            println!("  {} {} [{}]", m.id, m.describe(), m.status.code());
        }
    }
    if rankings.is_empty() {
        println!("No predictions for week {}", week_id);
    }
    for entry in &rankings {
        println!("{}", format_weekly_line(entry));
    }
    Ok(())
}

/// Handle the all-time rankings command
pub fn handle_all_time_rankings(ctx: &CommandContext, limit: usize, as_json: bool) -> Result<()> {
    let rankings = all_time_rankings(&ctx.db, limit)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&rankings)?); // tarpaulin::skip
    } else {
        for entry in &rankings {
            println!("{}", format_all_time_line(entry)); // tarpaulin::skip
        }
    }
    Ok(())
}
