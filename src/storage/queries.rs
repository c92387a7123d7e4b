//! Database query operations

use super::{models::*, schema::PickDatabase};
use crate::{MatchId, Pick, UserId, WeekId};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::HashMap;

const PREDICTION_COLUMNS: &str = "match_id, user_id, week_id, pick, awarded, points, snapshot,
                                  created_at, updated_at";

impl PickDatabase {
    /// Insert a user or rename an existing one. Points are left untouched.
    pub fn upsert_user(&mut self, user_id: &UserId, display_name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (user_id, display_name, points) VALUES (?, ?, 0)
             ON CONFLICT(user_id) DO UPDATE SET display_name = excluded.display_name",
            params![user_id.as_str(), display_name],
        )?;
        Ok(())
    }

    /// Create the user row if it is missing, named after the id.
    pub fn ensure_user(&mut self, user_id: &UserId) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO users (user_id, display_name, points) VALUES (?, ?, 0)",
            params![user_id.as_str(), user_id.as_str()],
        )?;
        Ok(())
    }

    pub fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT user_id, display_name, points FROM users WHERE user_id = ?",
                params![user_id.as_str()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Look up several users at once; unknown ids are absent from the map.
    pub fn users_by_ids<'a, I>(&self, user_ids: I) -> Result<HashMap<UserId, User>>
    where
        I: IntoIterator<Item = &'a UserId>,
    {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, display_name, points FROM users WHERE user_id = ?")?;
        let mut users = HashMap::new();
        for user_id in user_ids {
            if let Some(user) = stmt
                .query_row(params![user_id.as_str()], row_to_user)
                .optional()?
            {
                users.insert(user.user_id.clone(), user);
            }
        }
        Ok(users)
    }

    /// Users by cumulative points, highest first; ties by user id.
    pub fn top_users(&self, limit: usize) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, display_name, points FROM users
             ORDER BY points DESC, user_id ASC
             LIMIT ?",
        )?;
        let rows = stmt.query_map(params![limit as i64], row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Replace a week record and its ordered match list.
    pub fn upsert_week(&mut self, week: &Week) -> Result<()> {
        week.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO weeks (week_id, deadline, force_open) VALUES (?, ?, ?)
             ON CONFLICT(week_id) DO UPDATE SET
                deadline = excluded.deadline,
                force_open = excluded.force_open",
            params![
                week.week_id.as_str(),
                week.deadline.map(|d| d.timestamp()),
                week.force_open
            ],
        )?;
        tx.execute(
            "DELETE FROM week_matches WHERE week_id = ?",
            params![week.week_id.as_str()],
        )?;
        for (position, match_id) in week.match_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO week_matches (week_id, position, match_id) VALUES (?, ?, ?)",
                params![week.week_id.as_str(), position as i64, match_id.as_u64() as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_week(&self, week_id: &WeekId) -> Result<Option<Week>> {
        let header = self
            .conn
            .query_row(
                "SELECT deadline, force_open FROM weeks WHERE week_id = ?",
                params![week_id.as_str()],
                |row| Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, bool>(1)?)),
            )
            .optional()?;

        let Some((deadline, force_open)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT match_id FROM week_matches WHERE week_id = ? ORDER BY position",
        )?;
        let rows = stmt.query_map(params![week_id.as_str()], |row| row.get::<_, i64>(0))?;
        let mut match_ids = Vec::new();
        for row in rows {
            match_ids.push(MatchId::new(row? as u64));
        }

        Ok(Some(Week {
            week_id: week_id.clone(),
            match_ids,
            deadline: deadline.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            force_open,
        }))
    }

    /// Insert or overwrite a pending prediction.
    ///
    /// Returns `false` and changes nothing when the existing row is already
    /// awarded. `created_at` of an existing row is preserved.
    pub fn upsert_prediction(&mut self, prediction: &Prediction) -> Result<bool> {
        let snapshot = serde_json::to_string(&prediction.snapshot)?;
        let rows_affected = self.conn.execute(
            "INSERT INTO predictions
             (match_id, user_id, week_id, pick, awarded, points, snapshot, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, 0, ?, ?, ?)
             ON CONFLICT(match_id, user_id) DO UPDATE SET
                week_id = excluded.week_id,
                pick = excluded.pick,
                snapshot = excluded.snapshot,
                updated_at = excluded.updated_at
             WHERE predictions.awarded = 0",
            params![
                prediction.match_id.as_u64() as i64,
                prediction.user_id.as_str(),
                prediction.week_id.as_str(),
                prediction.pick.as_str(),
                snapshot,
                prediction.created_at,
                prediction.updated_at
            ],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn get_prediction(
        &self,
        match_id: MatchId,
        user_id: &UserId,
    ) -> Result<Option<Prediction>> {
        let sql = format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions WHERE match_id = ? AND user_id = ?"
        );
        let prediction = self
            .conn
            .query_row(
                &sql,
                params![match_id.as_u64() as i64, user_id.as_str()],
                row_to_prediction,
            )
            .optional()?;
        Ok(prediction)
    }

    /// Every unawarded prediction of `user_id`, in match id order.
    pub fn pending_predictions_for_user(&self, user_id: &UserId) -> Result<Vec<Prediction>> {
        let sql = format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions
             WHERE user_id = ? AND awarded = 0
             ORDER BY match_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id.as_str()], row_to_prediction)?;

        let mut predictions = Vec::new();
        for row in rows {
            predictions.push(row?);
        }
        Ok(predictions)
    }

    /// Every prediction of `user_id` in one week, awarded or not.
    pub fn predictions_for_user_in_week(
        &self,
        user_id: &UserId,
        week_id: &WeekId,
    ) -> Result<Vec<Prediction>> {
        let sql = format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions
             WHERE user_id = ? AND week_id = ?
             ORDER BY match_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id.as_str(), week_id.as_str()], row_to_prediction)?;

        let mut predictions = Vec::new();
        for row in rows {
            predictions.push(row?);
        }
        Ok(predictions)
    }

    /// Distinct users that still have unawarded predictions.
    pub fn users_with_pending_predictions(&self) -> Result<Vec<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT user_id FROM predictions WHERE awarded = 0 ORDER BY user_id",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut users = Vec::new();
        for row in rows {
            users.push(UserId::new(row?));
        }
        Ok(users)
    }

    /// Bulk read: all users' predictions for one match.
    pub fn predictions_for_match(&self, match_id: MatchId) -> Result<Vec<Prediction>> {
        let sql = format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions
             WHERE match_id = ?
             ORDER BY user_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![match_id.as_u64() as i64], row_to_prediction)?;

        let mut predictions = Vec::new();
        for row in rows {
            predictions.push(row?);
        }
        Ok(predictions)
    }

    /// Mark a prediction awarded and credit the user, as one transition.
    ///
    /// The update only applies while the row is still unawarded and still
    /// holds `pick`, the pick `points` were scored against. The user's total
    /// is incremented in the same transaction only when that update took
    /// effect. Returns whether this call performed the award.
    pub fn award_prediction(
        &mut self,
        match_id: MatchId,
        user_id: &UserId,
        pick: Pick,
        points: u32,
        snapshot: &MatchSnapshot,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let snapshot = serde_json::to_string(snapshot)?;
        let tx = self
            .conn
            .transaction()
            .context("starting award transaction")?;

        let transitioned = tx.execute(
            "UPDATE predictions
             SET awarded = 1, points = ?, snapshot = ?, updated_at = ?
             WHERE match_id = ? AND user_id = ? AND pick = ? AND awarded = 0",
            params![
                points,
                snapshot,
                now.timestamp(),
                match_id.as_u64() as i64,
                user_id.as_str(),
                pick.as_str()
            ],
        )? == 1;

        if transitioned && points > 0 {
            tx.execute(
                "INSERT INTO users (user_id, display_name, points) VALUES (?, ?, ?)
                 ON CONFLICT(user_id) DO UPDATE SET points = points + excluded.points",
                params![user_id.as_str(), user_id.as_str(), points as i64],
            )?;
        }

        tx.commit().context("committing award transaction")?;
        Ok(transitioned)
    }
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        user_id: UserId::new(row.get::<_, String>(0)?),
        display_name: row.get(1)?,
        points: row.get(2)?,
    })
}

fn row_to_prediction(row: &Row) -> rusqlite::Result<Prediction> {
    let pick_str: String = row.get(3)?;
    let pick = pick_str.parse::<Pick>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let snapshot_str: String = row.get(6)?;
    let snapshot = serde_json::from_str(&snapshot_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Prediction {
        match_id: MatchId::new(row.get::<_, i64>(0)? as u64),
        user_id: UserId::new(row.get::<_, String>(1)?),
        week_id: WeekId::new(row.get::<_, String>(2)?),
        pick,
        awarded: row.get(4)?,
        points: row.get(5)?,
        snapshot,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
