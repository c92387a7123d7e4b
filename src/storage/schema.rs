//! Database schema and connection management

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::PickemError;

/// Database connection manager for users, weeks and predictions
pub struct PickDatabase {
    pub(crate) conn: Connection,
}

impl PickDatabase {
    /// Open the database at the default location and ensure tables exist
    pub fn new() -> Result<Self> {
        Self::open(&Self::default_path()?)
    }

    /// Open (or create) the database at `path` and ensure tables exist
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory database, used by tests and dry runs
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// `<cache dir>/pickem/pickem.db`
    pub fn default_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| PickemError::InvalidConfig {
            message: "Could not determine cache directory".to_string(),
        })?;
        Ok(cache_dir.join("pickem").join("pickem.db"))
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                points INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS weeks (
                week_id TEXT PRIMARY KEY,
                deadline INTEGER,
                force_open INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS week_matches (
                week_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                match_id INTEGER NOT NULL,
                PRIMARY KEY (week_id, match_id),
                FOREIGN KEY (week_id) REFERENCES weeks(week_id) ON DELETE CASCADE
            )",
            [],
        )?;

        // One row per (match, user): a second pick overwrites the first
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS predictions (
                match_id INTEGER NOT NULL,
                user_id TEXT NOT NULL,
                week_id TEXT NOT NULL,
                pick TEXT NOT NULL CHECK (pick IN ('home', 'draw', 'away')),
                awarded INTEGER NOT NULL DEFAULT 0,
                points INTEGER NOT NULL DEFAULT 0,
                snapshot TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (match_id, user_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_predictions_pending
             ON predictions(user_id, awarded)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_points
             ON users(points DESC)",
            [],
        )?;

        Ok(())
    }
}
