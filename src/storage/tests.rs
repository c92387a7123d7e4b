//! Unit tests for storage functionality

use super::*;
use crate::{MatchId, Pick, UserId, WeekId};
use chrono::{DateTime, TimeZone, Utc};

fn create_test_db() -> PickDatabase {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute("PRAGMA foreign_keys = ON", []).unwrap();

    let mut db = PickDatabase { conn };
    db.initialize_schema().unwrap();
    db
}

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_723_800_000 + secs, 0).unwrap()
}

fn snapshot() -> MatchSnapshot {
    MatchSnapshot {
        home_team: "Arsenal".to_string(),
        away_team: "Wolves".to_string(),
        league: Some("Premier League".to_string()),
        match_date: "2024-08-17T14:00:00+00:00".to_string(),
        ..MatchSnapshot::default()
    }
}

fn pending(match_id: u64, user: &str, pick: Pick, at: i64) -> Prediction {
    Prediction::pending(
        MatchId::new(match_id),
        UserId::new(user),
        WeekId::new("w1"),
        pick,
        snapshot(),
        t(at),
    )
}

#[test]
fn test_database_creation() {
    let _db = create_test_db();
}

#[test]
fn test_upsert_user_keeps_points() {
    let mut db = create_test_db();
    let alice = UserId::new("alice");

    db.upsert_user(&alice, "Alice").unwrap();
    db.upsert_prediction(&pending(1, "alice", Pick::Home, 0)).unwrap();
    assert!(db
        .award_prediction(MatchId::new(1), &alice, Pick::Home, 1, &snapshot(), t(10))
        .unwrap());

    db.upsert_user(&alice, "Alice B.").unwrap();
    let user = db.get_user(&alice).unwrap().unwrap();
    assert_eq!(user.display_name, "Alice B.");
    assert_eq!(user.points, 1);
}

#[test]
fn test_ensure_user_does_not_rename() {
    let mut db = create_test_db();
    let bob = UserId::new("bob");

    db.upsert_user(&bob, "Bobby").unwrap();
    db.ensure_user(&bob).unwrap();
    assert_eq!(db.get_user(&bob).unwrap().unwrap().display_name, "Bobby");

    let carol = UserId::new("carol");
    db.ensure_user(&carol).unwrap();
    assert_eq!(db.get_user(&carol).unwrap().unwrap().display_name, "carol");
}

#[test]
fn test_get_user_missing() {
    let db = create_test_db();
    assert!(db.get_user(&UserId::new("ghost")).unwrap().is_none());
}

#[test]
fn test_week_roundtrip_preserves_order() {
    let mut db = create_test_db();
    let mut week = Week::new(
        WeekId::new("w1"),
        vec![MatchId::new(30), MatchId::new(10), MatchId::new(20)],
    );
    week.deadline = Some(t(3600));
    week.force_open = true;

    db.upsert_week(&week).unwrap();
    let loaded = db.get_week(&WeekId::new("w1")).unwrap().unwrap();
    assert_eq!(loaded, week);
}

#[test]
fn test_week_replace_match_list() {
    let mut db = create_test_db();
    db.upsert_week(&Week::new(
        WeekId::new("w1"),
        vec![MatchId::new(1), MatchId::new(2)],
    ))
    .unwrap();
    db.upsert_week(&Week::new(WeekId::new("w1"), vec![MatchId::new(3)]))
        .unwrap();

    let loaded = db.get_week(&WeekId::new("w1")).unwrap().unwrap();
    assert_eq!(loaded.match_ids, vec![MatchId::new(3)]);
    assert!(loaded.deadline.is_none());
    assert!(!loaded.force_open);
}

#[test]
fn test_week_rejects_more_than_ten_matches() {
    let mut db = create_test_db();
    let week = Week::new(WeekId::new("big"), (1..=11).map(MatchId::new).collect());

    let err = crate::PickemError::from(db.upsert_week(&week).unwrap_err());
    assert!(matches!(
        err,
        crate::PickemError::TooManyMatches { count: 11, max: 10 }
    ));
    assert!(db.get_week(&WeekId::new("big")).unwrap().is_none());
}

#[test]
fn test_week_rejects_duplicate_match() {
    let week = Week::new(
        WeekId::new("dup"),
        vec![MatchId::new(1), MatchId::new(1)],
    );
    assert!(week.validate().is_err());
}

#[test]
fn test_get_week_missing() {
    let db = create_test_db();
    assert!(db.get_week(&WeekId::new("nope")).unwrap().is_none());
}

#[test]
fn test_second_pick_overwrites_first() {
    let mut db = create_test_db();
    let alice = UserId::new("alice");

    assert!(db.upsert_prediction(&pending(1, "alice", Pick::Home, 0)).unwrap());
    assert!(db.upsert_prediction(&pending(1, "alice", Pick::Away, 60)).unwrap());

    let all = db.predictions_for_match(MatchId::new(1)).unwrap();
    assert_eq!(all.len(), 1);

    let p = db.get_prediction(MatchId::new(1), &alice).unwrap().unwrap();
    assert_eq!(p.pick, Pick::Away);
    assert_eq!(p.created_at, t(0).timestamp());
    assert_eq!(p.updated_at, t(60).timestamp());
}

#[test]
fn test_awarded_prediction_is_not_overwritten() {
    let mut db = create_test_db();
    let alice = UserId::new("alice");

    db.upsert_prediction(&pending(1, "alice", Pick::Home, 0)).unwrap();
    db.award_prediction(MatchId::new(1), &alice, Pick::Home, 1, &snapshot(), t(10))
        .unwrap();

    assert!(!db.upsert_prediction(&pending(1, "alice", Pick::Draw, 20)).unwrap());
    let p = db.get_prediction(MatchId::new(1), &alice).unwrap().unwrap();
    assert_eq!(p.pick, Pick::Home);
    assert!(p.awarded);
    assert_eq!(p.points, 1);
}

#[test]
fn test_award_is_conditional() {
    let mut db = create_test_db();
    let alice = UserId::new("alice");
    db.upsert_user(&alice, "Alice").unwrap();
    db.upsert_prediction(&pending(1, "alice", Pick::Home, 0)).unwrap();

    assert!(db
        .award_prediction(MatchId::new(1), &alice, Pick::Home, 1, &snapshot(), t(10))
        .unwrap());
    // A racing second award finds the row already awarded
    assert!(!db
        .award_prediction(MatchId::new(1), &alice, Pick::Home, 1, &snapshot(), t(11))
        .unwrap());

    assert_eq!(db.get_user(&alice).unwrap().unwrap().points, 1);
}

#[test]
fn test_award_zero_points_does_not_touch_user() {
    let mut db = create_test_db();
    let bob = UserId::new("bob");
    db.upsert_prediction(&pending(1, "bob", Pick::Away, 0)).unwrap();

    assert!(db
        .award_prediction(MatchId::new(1), &bob, Pick::Away, 0, &snapshot(), t(10))
        .unwrap());
    assert!(db.get_user(&bob).unwrap().is_none());

    let p = db.get_prediction(MatchId::new(1), &bob).unwrap().unwrap();
    assert!(p.awarded);
    assert_eq!(p.points, 0);
}

#[test]
fn test_award_creates_missing_user_row() {
    let mut db = create_test_db();
    let dave = UserId::new("dave");
    db.upsert_prediction(&pending(1, "dave", Pick::Draw, 0)).unwrap();

    db.award_prediction(MatchId::new(1), &dave, Pick::Draw, 1, &snapshot(), t(10))
        .unwrap();
    let user = db.get_user(&dave).unwrap().unwrap();
    assert_eq!(user.points, 1);
    assert_eq!(user.display_name, "dave");
}

#[test]
fn test_award_unknown_prediction_is_noop() {
    let mut db = create_test_db();
    let ghost = UserId::new("ghost");
    assert!(!db
        .award_prediction(MatchId::new(99), &ghost, Pick::Home, 1, &snapshot(), t(0))
        .unwrap());
    assert!(db.get_user(&ghost).unwrap().is_none());
}

#[test]
fn test_award_stores_final_snapshot() {
    let mut db = create_test_db();
    let alice = UserId::new("alice");
    db.upsert_prediction(&pending(1, "alice", Pick::Home, 0)).unwrap();

    let final_snapshot = MatchSnapshot {
        home_goals: Some(2),
        away_goals: Some(0),
        status: Some("FT".to_string()),
        ..snapshot()
    };
    db.award_prediction(
        MatchId::new(1),
        &alice,
        Pick::Home,
        1,
        &final_snapshot,
        t(10),
    )
    .unwrap();

    let p = db.get_prediction(MatchId::new(1), &alice).unwrap().unwrap();
    assert_eq!(p.snapshot, final_snapshot);
}

#[test]
fn test_pending_predictions_for_user() {
    let mut db = create_test_db();
    let alice = UserId::new("alice");
    db.upsert_prediction(&pending(3, "alice", Pick::Home, 0)).unwrap();
    db.upsert_prediction(&pending(1, "alice", Pick::Draw, 0)).unwrap();
    db.upsert_prediction(&pending(2, "bob", Pick::Away, 0)).unwrap();
    db.award_prediction(MatchId::new(3), &alice, Pick::Home, 0, &snapshot(), t(5))
        .unwrap();

    let pending = db.pending_predictions_for_user(&alice).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].match_id, MatchId::new(1));
}

#[test]
fn test_users_with_pending_predictions() {
    let mut db = create_test_db();
    db.upsert_prediction(&pending(1, "carol", Pick::Home, 0)).unwrap();
    db.upsert_prediction(&pending(2, "alice", Pick::Home, 0)).unwrap();
    db.upsert_prediction(&pending(3, "alice", Pick::Home, 0)).unwrap();
    db.upsert_prediction(&pending(4, "bob", Pick::Home, 0)).unwrap();
    let bob = UserId::new("bob");
    db.award_prediction(MatchId::new(4), &bob, Pick::Home, 1, &snapshot(), t(1))
        .unwrap();

    let users = db.users_with_pending_predictions().unwrap();
    assert_eq!(users, vec![UserId::new("alice"), UserId::new("carol")]);
}

#[test]
fn test_predictions_for_user_in_week() {
    let mut db = create_test_db();
    db.upsert_prediction(&pending(1, "alice", Pick::Home, 0)).unwrap();
    let mut other_week = pending(2, "alice", Pick::Home, 0);
    other_week.week_id = WeekId::new("w2");
    db.upsert_prediction(&other_week).unwrap();

    let in_w1 = db
        .predictions_for_user_in_week(&UserId::new("alice"), &WeekId::new("w1"))
        .unwrap();
    assert_eq!(in_w1.len(), 1);
    assert_eq!(in_w1[0].match_id, MatchId::new(1));
}

#[test]
fn test_top_users_order_and_limit() {
    let mut db = create_test_db();
    for (id, pts) in [("a", 3u32), ("b", 5), ("c", 3), ("d", 1)] {
        let user = UserId::new(id);
        db.upsert_user(&user, id).unwrap();
        for m in 0..pts {
            let match_id = 100 * (id.as_bytes()[0] as u64) + m as u64;
            db.upsert_prediction(&pending(match_id, id, Pick::Home, 0)).unwrap();
            db.award_prediction(MatchId::new(match_id), &user, Pick::Home, 1, &snapshot(), t(1))
                .unwrap();
        }
    }

    let top = db.top_users(3).unwrap();
    let ids: Vec<&str> = top.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
    assert_eq!(top[0].points, 5);
}

#[test]
fn test_users_by_ids_skips_unknown() {
    let mut db = create_test_db();
    db.upsert_user(&UserId::new("a"), "Ann").unwrap();
    let ids = [UserId::new("a"), UserId::new("zz")];

    let users = db.users_by_ids(ids.iter()).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[&UserId::new("a")].display_name, "Ann");
}

#[test]
fn test_award_skips_a_pick_changed_since_it_was_read() {
    let mut db = create_test_db();
    let alice = UserId::new("alice");
    db.upsert_prediction(&pending(1, "alice", Pick::Home, 0)).unwrap();
    let read = db.pending_predictions_for_user(&alice).unwrap();

    // Resubmitted before the award lands
    db.upsert_prediction(&pending(1, "alice", Pick::Away, 5)).unwrap();

    assert!(!db
        .award_prediction(MatchId::new(1), &alice, read[0].pick, 1, &snapshot(), t(10))
        .unwrap());
    assert!(db.get_user(&alice).unwrap().is_none());

    let p = db.get_prediction(MatchId::new(1), &alice).unwrap().unwrap();
    assert!(!p.awarded);
    assert_eq!(p.pick, Pick::Away);
}
