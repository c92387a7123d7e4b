//! Admission gate: are picks for a week still accepted?

use chrono::{DateTime, Duration, Utc};

use crate::{config::DEFAULT_GATE_OFFSET_MINUTES, provider::Match, storage::Week};

/// Gate state for a week at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Open until `closes_at`.
    Open { closes_at: DateTime<Utc> },
    /// Opened by hand; timing is ignored.
    ForcedOpen,
    Closed { closed_at: DateTime<Utc> },
    /// No match in the week has a usable kickoff and no deadline is set.
    NoSchedule,
}

impl GateStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, GateStatus::Open { .. } | GateStatus::ForcedOpen)
    }
}

/// Closes picks a fixed offset before the week's earliest kickoff, or at the
/// week's explicit deadline when it has one. Stateless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionGate {
    offset: Duration,
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_GATE_OFFSET_MINUTES))
    }
}

impl AdmissionGate {
    pub fn new(offset: Duration) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Earliest parseable kickoff among `fixtures` that belong to `week`.
    pub fn earliest_kickoff(week: &Week, fixtures: &[Match]) -> Option<DateTime<Utc>> {
        fixtures
            .iter()
            .filter(|m| week.contains(m.id))
            .filter_map(Match::kickoff_at)
            .min()
    }

    /// The instant picks stop being accepted, ignoring `force_open`.
    pub fn close_instant(&self, week: &Week, fixtures: &[Match]) -> Option<DateTime<Utc>> {
        if let Some(deadline) = week.deadline {
            return Some(deadline);
        }
        Self::earliest_kickoff(week, fixtures).map(|kickoff| kickoff - self.offset)
    }

    pub fn status(&self, week: &Week, fixtures: &[Match], now: DateTime<Utc>) -> GateStatus {
        if week.force_open {
            return GateStatus::ForcedOpen;
        }
        match self.close_instant(week, fixtures) {
            None => GateStatus::NoSchedule,
            Some(closes_at) if now < closes_at => GateStatus::Open { closes_at },
            Some(closed_at) => GateStatus::Closed { closed_at },
        }
    }

    /// True iff picks for `week` are accepted at `now`.
    pub fn can_submit(&self, week: &Week, fixtures: &[Match], now: DateTime<Utc>) -> bool {
        self.status(week, fixtures, now).is_open()
    }

    /// Time left before the gate closes; `None` when closed, forced open or
    /// unscheduled.
    pub fn time_until_close(
        &self,
        week: &Week,
        fixtures: &[Match],
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        match self.status(week, fixtures, now) {
            GateStatus::Open { closes_at } => Some(closes_at - now),
            _ => None,
        }
    }
}
