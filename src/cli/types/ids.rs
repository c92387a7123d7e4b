//! ID types for matches, users and weeks.

use crate::error::{PickemError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for match-provider fixture IDs.
///
/// # Examples
///
/// ```rust
/// use pickem::MatchId;
///
/// let match_id = MatchId::new(1035037);
/// assert_eq!(match_id.as_u64(), 1035037);
/// assert_eq!(match_id.to_string(), "1035037");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl MatchId {
    /// Create a new MatchId from a u64 value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Opaque user identifier handed over by the host's auth layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PickemError::InvalidConfig {
                message: "user id must not be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Week identifier: either an explicit opaque id or `"{from}_{to}"`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use pickem::WeekId;
///
/// let from = NaiveDate::from_ymd_opt(2024, 8, 16).unwrap();
/// let to = NaiveDate::from_ymd_opt(2024, 8, 19).unwrap();
/// assert_eq!(WeekId::from_range(from, to).as_str(), "2024-08-16_2024-08-19");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekId(pub String);

impl WeekId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id of a week spanning `from..=to`.
    pub fn from_range(from: NaiveDate, to: NaiveDate) -> Self {
        Self(format!("{}_{}", from.format("%Y-%m-%d"), to.format("%Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WeekId {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PickemError::InvalidConfig {
                message: "week id must not be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_id_parse() {
        assert_eq!("42".parse::<MatchId>().unwrap(), MatchId::new(42));
        assert_eq!(" 7 ".parse::<MatchId>().unwrap(), MatchId::new(7));
        assert!("abc".parse::<MatchId>().is_err());
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!("   ".parse::<UserId>().is_err());
        assert_eq!("alice".parse::<UserId>().unwrap().as_str(), "alice");
    }

    #[test]
    fn test_week_id_from_range() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let week = WeekId::from_range(from, to);
        assert_eq!(week.to_string(), "2025-01-03_2025-01-06");
    }

    #[test]
    fn test_ids_order_for_deterministic_iteration() {
        let mut users = vec![UserId::new("carol"), UserId::new("alice"), UserId::new("bob")];
        users.sort();
        assert_eq!(users[0].as_str(), "alice");
        assert_eq!(users[2].as_str(), "carol");
    }
}
