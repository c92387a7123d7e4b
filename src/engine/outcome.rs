//! Finished match to canonical result.

use std::cmp::Ordering;

use crate::{provider::Match, Outcome};

/// Resolve a match to Home, Draw or Away.
///
/// Anything short of a finished status with both scores present is
/// [`Outcome::Undetermined`].
pub fn resolve_outcome(m: &Match) -> Outcome {
    if !m.status.is_finished() {
        return Outcome::Undetermined;
    }
    match (m.home_goals, m.away_goals) {
        (Some(home), Some(away)) => match home.cmp(&away) {
            Ordering::Greater => Outcome::Home,
            Ordering::Less => Outcome::Away,
            Ordering::Equal => Outcome::Draw,
        },
        _ => Outcome::Undetermined,
    }
}
