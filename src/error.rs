//! Error types for the pick'em engine

use thiserror::Error;


pub type Result<T> = std::result::Result<T, PickemError>;

#[derive(Error, Debug)]
pub enum PickemError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to parse numeric id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Invalid date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    #[error("Data unavailable: {message}")]
    DataUnavailable { message: String },

    #[error("Not authorized by match provider: {message}")]
    Unauthorized { message: String },

    #[error("Picks closed for week {week_id}")]
    PicksClosed { week_id: String },

    #[error("Match {match_id} is not part of week {week_id}")]
    MatchNotInWeek { match_id: u64, week_id: String },

    #[error("Week not found: {week_id}")]
    WeekNotFound { week_id: String },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("A week holds at most {max} matches, got {count}")]
    TooManyMatches { count: usize, max: usize },

    #[error("Invalid pick: {value}")]
    InvalidPick { value: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Storage returns `anyhow` errors. Domain errors raised inside it come back
/// unchanged; anything else means the store itself failed.
impl From<anyhow::Error> for PickemError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<PickemError>() {
            Ok(domain) => domain,
            Err(err) => PickemError::DataUnavailable {
                message: format!("{:#}", err),
            },
        }
    }
}

impl PickemError {
    /// True for errors raised by the host environment's credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, PickemError::Unauthorized { .. })
    }
}
