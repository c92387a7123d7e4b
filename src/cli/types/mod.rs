//! Type-safe wrappers and enums shared by the CLI and the engine.

pub mod ids;
pub mod pick;

pub use ids::{MatchId, UserId, WeekId};
pub use pick::{Outcome, Pick};
