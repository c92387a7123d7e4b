//! Weekly and all-time leaderboards.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use super::prediction_cache::{PredictionCache, WeekPredictions};
use crate::{
    storage::{PickDatabase, User},
    Result, UserId, WeekId,
};

/// One row of a weekly leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    /// 1-based, never shared.
    pub rank: usize,
    pub user_id: UserId,
    pub display_name: String,
    /// Points from awarded predictions this week.
    pub weekly_points: u32,
    /// Predictions made this week, awarded or not.
    pub weekly_total: u32,
}

/// One row of the all-time leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllTimeEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub display_name: String,
    pub points: i64,
}

#[derive(Default)]
struct Tally {
    points: u32,
    total: u32,
}

/// Rank a week's predictions.
///
/// Order is points desc, then predictions made desc, then user id. Users with
/// no prediction in the week never appear. `users` only supplies display
/// names; a missing user falls back to the id.
pub fn rank_week(predictions: &WeekPredictions, users: &HashMap<UserId, User>) -> Vec<RankingEntry> {
    // BTreeMap iteration gives the ascending-id order the stable sort keeps
    let mut tallies: BTreeMap<&UserId, Tally> = BTreeMap::new();
    for by_user in predictions.values() {
        for (user_id, prediction) in by_user {
            let tally = tallies.entry(user_id).or_default();
            tally.total += 1;
            if prediction.awarded {
                tally.points += prediction.points;
            }
        }
    }

    let mut rows: Vec<(&UserId, Tally)> =
        tallies.into_iter().filter(|(_, t)| t.total > 0).collect();
    rows.sort_by(|(_, a), (_, b)| b.points.cmp(&a.points).then(b.total.cmp(&a.total)));

    rows.into_iter()
        .enumerate()
        .map(|(i, (user_id, tally))| RankingEntry {
            rank: i + 1,
            user_id: user_id.clone(),
            display_name: users
                .get(user_id)
                .map(|u| u.display_name.clone())
                .unwrap_or_else(|| user_id.to_string()),
            weekly_points: tally.points,
            weekly_total: tally.total,
        })
        .collect()
}

/// Leaderboard for one week. An unknown week or one without matches ranks
/// nobody.
pub fn weekly_rankings(
    db: &PickDatabase,
    cache: &PredictionCache,
    week_id: &WeekId,
) -> Result<Vec<RankingEntry>> {
    let Some(week) = db.get_week(week_id)? else {
        debug!(week = %week_id, "unknown week, empty ranking");
        return Ok(Vec::new());
    };
    if week.match_ids.is_empty() {
        return Ok(Vec::new());
    }

    cache.focus_week(week_id);
    let predictions = cache.get_predictions_for_week(db, week_id, &week.match_ids)?;

    let user_ids: Vec<&UserId> = predictions.values().flat_map(|m| m.keys()).collect();
    let users = db.users_by_ids(user_ids)?;

    Ok(rank_week(&predictions, &users))
}

/// Users by cumulative points, at most `limit` of them.
pub fn all_time_rankings(db: &PickDatabase, limit: usize) -> Result<Vec<AllTimeEntry>> {
    let users = db.top_users(limit)?;
    Ok(users
        .into_iter()
        .enumerate()
        .map(|(i, user)| AllTimeEntry {
            rank: i + 1,
            user_id: user.user_id,
            display_name: user.display_name,
            points: user.points,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::PredictionSnapshot, MatchId, Pick};

    fn snap(pick: Pick, awarded: bool, points: u32) -> PredictionSnapshot {
        PredictionSnapshot {
            pick,
            awarded,
            points,
        }
    }

    fn week_map(rows: &[(u64, &str, PredictionSnapshot)]) -> WeekPredictions {
        let mut map = WeekPredictions::new();
        for (match_id, user, p) in rows {
            map.entry(MatchId::new(*match_id))
                .or_default()
                .insert(UserId::new(*user), *p);
        }
        map
    }

    fn ids(entries: &[RankingEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.user_id.as_str()).collect()
    }

    #[test]
    fn test_points_then_volume() {
        let map = week_map(&[
            (1, "ann", snap(Pick::Home, true, 1)),
            (2, "ann", snap(Pick::Draw, true, 0)),
            (3, "ann", snap(Pick::Away, false, 0)),
            (1, "ben", snap(Pick::Home, true, 1)),
            (2, "ben", snap(Pick::Away, true, 0)),
            (1, "cat", snap(Pick::Home, true, 1)),
            (2, "cat", snap(Pick::Draw, true, 1)),
        ]);

        let ranking = rank_week(&map, &HashMap::new());
        assert_eq!(ids(&ranking), vec!["cat", "ann", "ben"]);
        assert_eq!(ranking[1].weekly_points, 1);
        assert_eq!(ranking[1].weekly_total, 3);
        assert_eq!(
            ranking.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_full_tie_is_ordered_by_user_id() {
        let map = week_map(&[
            (1, "zed", snap(Pick::Home, true, 1)),
            (1, "amy", snap(Pick::Home, true, 1)),
            (1, "max", snap(Pick::Home, true, 1)),
        ]);

        let ranking = rank_week(&map, &HashMap::new());
        assert_eq!(ids(&ranking), vec!["amy", "max", "zed"]);
        assert_eq!(ranking[2].rank, 3);
    }

    #[test]
    fn test_unawarded_points_do_not_count() {
        let map = week_map(&[(1, "ann", snap(Pick::Home, false, 1))]);
        let ranking = rank_week(&map, &HashMap::new());
        assert_eq!(ranking[0].weekly_points, 0);
        assert_eq!(ranking[0].weekly_total, 1);
    }

    #[test]
    fn test_display_name_fallback() {
        let map = week_map(&[
            (1, "ann", snap(Pick::Home, true, 1)),
            (1, "ben", snap(Pick::Away, true, 0)),
        ]);
        let mut users = HashMap::new();
        users.insert(
            UserId::new("ann"),
            User {
                user_id: UserId::new("ann"),
                display_name: "Ann Smith".to_string(),
                points: 40,
            },
        );

        let ranking = rank_week(&map, &users);
        assert_eq!(ranking[0].display_name, "Ann Smith");
        assert_eq!(ranking[1].display_name, "ben");
    }

    #[test]
    fn test_empty_week() {
        assert!(rank_week(&WeekPredictions::new(), &HashMap::new()).is_empty());

        let mut map = WeekPredictions::new();
        map.insert(MatchId::new(1), BTreeMap::new());
        assert!(rank_week(&map, &HashMap::new()).is_empty());
    }
}
