//! Scoring and ranking engine
//!
//! - `outcome`: finished match to Home / Draw / Away
//! - `gate`: whether picks for a week are still accepted
//! - `submit`: storing a pick behind the gate
//! - `award`: awarding pending predictions exactly once
//! - `prediction_cache`: per-week cache feeding the rankings
//! - `rankings`: weekly and all-time leaderboards

pub mod award;
pub mod gate;
pub mod outcome;
pub mod prediction_cache;
pub mod rankings;
pub mod submit;

pub use award::{award_pending_for_all, award_pending_for_user, AwardFailure, AwardSummary};
pub use gate::{AdmissionGate, GateStatus};
pub use outcome::resolve_outcome;
pub use prediction_cache::{PredictionCache, WeekPredictions};
pub use rankings::{all_time_rankings, rank_week, weekly_rankings, AllTimeEntry, RankingEntry};
pub use submit::{submit_prediction, Submission};
