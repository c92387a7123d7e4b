//! Gate status command implementation

use chrono::{DateTime, Utc};

use super::CommandContext;
use crate::{engine::GateStatus, error::PickemError, Result, WeekId};

/// Parse `--at`, defaulting to the current time.
pub fn parse_instant(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw.trim())?.with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// One line describing the gate, e.g. `open, closes in 2h 5m (2024-08-17T13:55:00Z)`.
pub fn describe_status(status: &GateStatus, now: DateTime<Utc>) -> String {
    match status {
        GateStatus::Open { closes_at } => {
            let left = *closes_at - now;
            format!(
                "open, closes in {}h {}m ({})",
                left.num_hours(),
                left.num_minutes() % 60,
                closes_at.to_rfc3339()
            )
        }
        GateStatus::ForcedOpen => "open (forced)".to_string(),
        GateStatus::Closed { closed_at } => format!("closed since {}", closed_at.to_rfc3339()),
        GateStatus::NoSchedule => "closed (no valid kickoff)".to_string(),
    }
}

/// Handle the gate command
pub async fn handle_gate(ctx: &mut CommandContext, week_id: WeekId, at: Option<String>) -> Result<()> {
    let now = parse_instant(at.as_deref())?;
    let gate = ctx.gate();
    let cache = ctx.cache();
    let (db, provider) = ctx.db_and_provider()?;

    let week = db
        .get_week(&week_id)?
        .ok_or_else(|| PickemError::WeekNotFound {
            week_id: week_id.to_string(),
        })?;

    let fixtures = cache
        .fixtures_for_week(provider, &week_id, &week.match_ids)
        .await;
    let status = gate.status(&week, &fixtures, now);

    println!("Week {}: {}", week_id, describe_status(&status, now)); // tarpaulin::skip
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_parse_instant() {
        let parsed = parse_instant(Some("2024-08-17T15:00:00+01:00")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 8, 17, 14, 0, 0).unwrap());
        assert!(matches!(
            parse_instant(Some("tomorrow")),
            Err(PickemError::InvalidDate(_))
        ));
        assert!(parse_instant(None).is_ok());
    }

    #[test]
    fn test_describe_status() {
        let now = Utc.with_ymd_and_hms(2024, 8, 17, 11, 50, 0).unwrap();
        let closes_at = now + Duration::minutes(125);

        assert_eq!(
            describe_status(&GateStatus::Open { closes_at }, now),
            "open, closes in 2h 5m (2024-08-17T13:55:00+00:00)"
        );
        assert_eq!(describe_status(&GateStatus::ForcedOpen, now), "open (forced)");
        assert!(describe_status(&GateStatus::Closed { closed_at: now }, now).starts_with("closed since"));
        assert_eq!(
            describe_status(&GateStatus::NoSchedule, now),
            "closed (no valid kickoff)"
        );
    }
}
