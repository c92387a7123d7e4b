//! Pick and outcome symbols.

use crate::error::PickemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user's prediction for one match.
///
/// Accepts the long names as well as the classic `1` / `X` / `2` pool notation.
///
/// # Examples
///
/// ```rust
/// use pickem::Pick;
///
/// assert_eq!("home".parse::<Pick>().unwrap(), Pick::Home);
/// assert_eq!("x".parse::<Pick>().unwrap(), Pick::Draw);
/// assert_eq!(Pick::Away.to_string(), "away");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pick {
    Home,
    Draw,
    Away,
}

impl Pick {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pick::Home => "home",
            Pick::Draw => "draw",
            Pick::Away => "away",
        }
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pick {
    type Err = PickemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" | "h" | "1" => Ok(Pick::Home),
            "draw" | "d" | "x" => Ok(Pick::Draw),
            "away" | "a" | "2" => Ok(Pick::Away),
            _ => Err(PickemError::InvalidPick {
                value: s.to_string(),
            }),
        }
    }
}

/// Canonical result of a match, as far as it is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
    Undetermined,
}

impl Outcome {
    /// The pick that this outcome rewards, if the match is decided.
    pub fn winning_pick(&self) -> Option<Pick> {
        match self {
            Outcome::Home => Some(Pick::Home),
            Outcome::Draw => Some(Pick::Draw),
            Outcome::Away => Some(Pick::Away),
            Outcome::Undetermined => None,
        }
    }

    pub fn is_determined(&self) -> bool {
        !matches!(self, Outcome::Undetermined)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Home => "home",
            Outcome::Draw => "draw",
            Outcome::Away => "away",
            Outcome::Undetermined => "undetermined",
        };
        f.write_str(s)
    }
}
