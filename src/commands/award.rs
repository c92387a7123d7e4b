//! Award command implementation

use std::collections::BTreeMap;

use super::CommandContext;
use crate::{
    engine::{award_pending_for_all, award_pending_for_user, AwardSummary},
    Result, UserId,
};

pub fn format_summary(user_id: &UserId, summary: &AwardSummary) -> String {
    let mut line = format!(
        "{}: {} awarded, {} pts, {} skipped",
        user_id, summary.updated, summary.points_awarded, summary.skipped
    );
    if !summary.failures.is_empty() {
        line.push_str(&format!(", {} failed", summary.failures.len()));
    }
    line
}

/// Handle the award command. `user` of `None` means every user.
pub async fn handle_award(
    ctx: &mut CommandContext,
    user: Option<UserId>,
    as_json: bool,
) -> Result<()> {
    let (db, provider) = ctx.db_and_provider()?;

    let results = match user {
        Some(user_id) => {
            let summary = award_pending_for_user(db, provider, &user_id).await?;
            BTreeMap::from([(user_id, summary)])
        }
        None => award_pending_for_all(db, provider).await?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&results)?); // tarpaulin::skip
        return Ok(());
    }

    // tarpaulin::skip - console output
    let mut total = AwardSummary::default();
    for (user_id, summary) in &results {
        println!("{}", format_summary(user_id, summary));
        for failure in &summary.failures {
            println!("  ⚠ match {}: {}", failure.match_id, failure.message);
        }
        total.merge(summary);
    }
    if results.len() > 1 {
        println!(
            "✓ {} users, {} predictions awarded, {} pts",
            results.len(),
            total.updated,
            total.points_awarded
        );
    } else if results.is_empty() {
        println!("Nothing to award");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::AwardFailure, MatchId};

    #[test]
    fn test_format_summary() {
        let mut summary = AwardSummary {
            updated: 3,
            points_awarded: 2,
            skipped: 1,
            failures: vec![],
        };
        let ann = UserId::new("ann");
        assert_eq!(
            format_summary(&ann, &summary),
            "ann: 3 awarded, 2 pts, 1 skipped"
        );

        summary.failures.push(AwardFailure {
            match_id: MatchId::new(9),
            message: "down".to_string(),
        });
        assert!(format_summary(&ann, &summary).ends_with(", 1 failed"));
    }
}
