//! Pick'em Scoring Library
//!
//! Users pick Home, Draw or Away for a curated set of matches grouped into
//! weeks. This crate decides whether picks are still accepted, turns finished
//! matches into points exactly once, and builds weekly and all-time
//! leaderboards.
//!
//! ## Features
//!
//! - **Admission Gate**: Picks close a configurable offset before the week's earliest kickoff
//! - **Award Engine**: Idempotent, transactional scoring of finished matches
//! - **Rankings**: Weekly leaderboards with deterministic tie-breaks, plus all-time totals
//! - **Prediction Cache**: TTL cache of a week's predictions and fixtures
//! - **Match Providers**: API-Football over HTTP, or a static JSON fixtures file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pickem::{
//!     engine::{award_pending_for_user, weekly_rankings, PredictionCache},
//!     provider::StaticMatchProvider,
//!     storage::PickDatabase,
//!     UserId, WeekId,
//! };
//!
//! # async fn example() -> pickem::Result<()> {
//! let mut db = PickDatabase::new()?;
//! let provider = StaticMatchProvider::load(std::path::Path::new("fixtures.json"))?;
//!
//! award_pending_for_user(&mut db, &provider, &UserId::new("alice")).await?;
//!
//! let cache = PredictionCache::default();
//! for entry in weekly_rankings(&db, &cache, &WeekId::new("2024-08-16_2024-08-19"))? {
//!     println!("{}. {} {}", entry.rank, entry.display_name, entry.weekly_points);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set your API-Football key to read live match data:
//! ```bash
//! export PICKEM_API_KEY=your-key
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod provider;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{MatchId, Outcome, Pick, UserId, WeekId};
pub use config::PickemConfig;
pub use error::{PickemError, Result};

pub const API_KEY_ENV_VAR: &str = "PICKEM_API_KEY";
