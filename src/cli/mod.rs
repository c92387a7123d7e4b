//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use types::{MatchId, Pick, UserId, WeekId};

/// Where data comes from; shared by every command.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// SQLite database path (or set `PICKEM_DB_PATH`).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Read matches from a JSON fixtures file instead of the live API.
    #[clap(long, global = true)]
    pub fixtures: Option<PathBuf>,

    /// Minutes before the earliest kickoff that picks close
    /// (or set `PICKEM_GATE_OFFSET_MINUTES`).
    #[clap(long, global = true)]
    pub offset_minutes: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum GetCmd {
    /// Show whether picks for a week are still accepted.
    Gate {
        #[clap(long, short)]
        week: WeekId,

        /// Evaluate at this instant (RFC 3339) instead of now. Display only.
        #[clap(long)]
        at: Option<String>,
    },

    /// Leaderboard for one week.
    WeeklyRankings {
        #[clap(long, short)]
        week: WeekId,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,

        /// Also list the week's fixtures.
        #[clap(long)]
        with_fixtures: bool,
    },

    /// One user's picks for a week, with results once awarded.
    Picks {
        #[clap(long, short)]
        week: WeekId,

        #[clap(long, short)]
        user: UserId,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Leaderboard over cumulative points.
    AllTimeRankings {
        #[clap(long, short, default_value_t = 10)]
        limit: usize,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SetCmd {
    /// Create or rename a user.
    User {
        #[clap(long)]
        id: UserId,

        #[clap(long)]
        name: String,
    },

    /// Create or replace a week and its match list.
    #[clap(group(ArgGroup::new("week_id").required(true).args(["id", "from"])))]
    Week {
        /// Explicit week id.
        #[clap(long)]
        id: Option<WeekId>,

        /// First day of the week (YYYY-MM-DD); the id becomes `{from}_{to}`.
        #[clap(long, requires = "to")]
        from: Option<NaiveDate>,

        #[clap(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Match ids, in display order (repeatable, at most 10).
        #[clap(long = "match", short = 'm', required = true)]
        matches: Vec<MatchId>,

        /// Explicit close instant (RFC 3339), replacing the kickoff offset.
        #[clap(long)]
        deadline: Option<String>,

        /// Accept picks regardless of timing.
        #[clap(long)]
        force_open: bool,
    },

    /// Submit a pick. The gate is checked against the current time.
    Pick {
        #[clap(long, short)]
        week: WeekId,

        #[clap(long, short)]
        user: UserId,

        #[clap(long = "match", short = 'm')]
        match_id: MatchId,

        #[clap(long, short, value_enum)]
        pick: Pick,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "pickem", about = "Pick'em scoring and rankings")]
pub struct Pickem {
    #[clap(flatten)]
    pub global: GlobalOpts,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read gate status and leaderboards
    Get {
        #[clap(subcommand)]
        cmd: GetCmd,
    },

    /// Write users, weeks and picks
    Set {
        #[clap(subcommand)]
        cmd: SetCmd,
    },

    /// Award pending predictions whose matches have finished
    #[clap(group(ArgGroup::new("target").required(true).args(["user", "all"])))]
    Award {
        #[clap(long, short)]
        user: Option<UserId>,

        /// Every user with pending predictions.
        #[clap(long)]
        all: bool,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}
