//! Match records and the provider's wire envelope.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PickemError, Result};
use crate::MatchId;


/// Provider status code, reduced to what the engine cares about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    NotStarted,
    Live,
    /// Finished in normal time (`FT`)
    Finished,
    /// Finished after extra time (`AET`)
    FinishedAfterExtraTime,
    /// Finished on penalties (`PEN`)
    FinishedOnPenalties,
    Postponed,
    Cancelled,
    Abandoned,
    Other(String),
}

impl MatchStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "NS" | "TBD" => MatchStatus::NotStarted,
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" | "SUSP" => MatchStatus::Live,
            "FT" => MatchStatus::Finished,
            "AET" => MatchStatus::FinishedAfterExtraTime,
            "PEN" => MatchStatus::FinishedOnPenalties,
            "PST" => MatchStatus::Postponed,
            "CANC" => MatchStatus::Cancelled,
            "ABD" => MatchStatus::Abandoned,
            other => MatchStatus::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            MatchStatus::NotStarted => "NS",
            MatchStatus::Live => "LIVE",
            MatchStatus::Finished => "FT",
            MatchStatus::FinishedAfterExtraTime => "AET",
            MatchStatus::FinishedOnPenalties => "PEN",
            MatchStatus::Postponed => "PST",
            MatchStatus::Cancelled => "CANC",
            MatchStatus::Abandoned => "ABD",
            MatchStatus::Other(code) => code,
        }
    }

    /// Normal time, extra time or penalties.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            MatchStatus::Finished
                | MatchStatus::FinishedAfterExtraTime
                | MatchStatus::FinishedOnPenalties
        )
    }
}

impl From<String> for MatchStatus {
    fn from(code: String) -> Self {
        MatchStatus::from_code(&code)
    }
}

impl From<MatchStatus> for String {
    fn from(status: MatchStatus) -> Self {
        status.code().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

/// A fixture as the engine sees it. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Raw kickoff string from the provider; parsed on demand.
    pub kickoff: String,
    pub status: MatchStatus,
    #[serde(default)]
    pub league: Option<String>,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_goals: Option<u32>,
}

impl Match {
    /// Kickoff as UTC, or `None` when the provider date does not parse.
    ///
    /// Accepts RFC 3339 and offset-less `YYYY-MM-DDTHH:MM:SS` (read as UTC).
    pub fn kickoff_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.kickoff.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// "Home 2-1 Away", or "Home vs Away" before a score is known.
    pub fn describe(&self) -> String {
        match (self.home_goals, self.away_goals) {
            (Some(h), Some(a)) => format!(
                "{} {}-{} {}",
                self.home_team.name, h, a, self.away_team.name
            ),
            _ => format!("{} vs {}", self.home_team.name, self.away_team.name),
        }
    }
}

/// Top-level `/fixtures` response.
#[derive(Debug, Deserialize)]
pub struct FixturesEnvelope {
    #[serde(default)]
    pub errors: serde_json::Value,
    #[serde(default)]
    pub response: Vec<FixtureItem>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureItem {
    pub fixture: FixtureInfo,
    #[serde(default)]
    pub league: Option<LeagueInfo>,
    pub teams: TeamsInfo,
    #[serde(default)]
    pub goals: GoalsInfo,
}

#[derive(Debug, Deserialize)]
pub struct FixtureInfo {
    pub id: u64,
    pub date: String,
    pub status: StatusInfo,
}

#[derive(Debug, Deserialize)]
pub struct StatusInfo {
    pub short: String,
}

#[derive(Debug, Deserialize)]
pub struct LeagueInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamsInfo {
    pub home: Team,
    pub away: Team,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalsInfo {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl From<FixtureItem> for Match {
    fn from(item: FixtureItem) -> Self {
        Match {
            id: MatchId::new(item.fixture.id),
            kickoff: item.fixture.date,
            status: MatchStatus::from_code(&item.fixture.status.short),
            league: item.league.map(|l| l.name),
            home_team: item.teams.home,
            away_team: item.teams.away,
            home_goals: item.goals.home,
            away_goals: item.goals.away,
        }
    }
}

impl FixturesEnvelope {
    /// The provider reports key problems in-band with HTTP 200; surface them.
    pub fn into_matches(self) -> Result<Vec<Match>> {
        if let Some(errors) = self.errors.as_object().filter(|e| !e.is_empty()) {
            let message = errors
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v.as_str().unwrap_or_default()))
                .collect::<Vec<_>>()
                .join("; ");
            let auth = errors
                .keys()
                .any(|k| matches!(k.as_str(), "token" | "access" | "requests"));
            return Err(if auth {
                PickemError::Unauthorized { message }
            } else {
                PickemError::DataUnavailable { message }
            });
        }
        Ok(self.response.into_iter().map(Match::from).collect())
    }
}
