//! Weekly series and leaderboard assembly against the real store.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use focusquest_core::{leaderboard, Database, Gamification, Store};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn record_session(db: &Database, user: Uuid, days_ago: i64, minutes: u32) {
    let started = Utc.from_utc_datetime(
        &(today() - Duration::days(days_ago))
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    );
    let session = db.start_session(user, None, started).unwrap();
    db.end_session(session.id, minutes, started + Duration::minutes(minutes as i64))
        .unwrap();
}

#[test]
fn week_series_zero_fills_missing_days() {
    let db = Database::open_memory().unwrap();
    let user = db.current_user().unwrap();
    record_session(&db, user, 0, 30);
    record_session(&db, user, 2, 45);
    // Outside the trailing window; must not appear.
    record_session(&db, user, 9, 120);

    let game = Gamification::load(db, user, today()).unwrap();
    let week = game.week();

    assert_eq!(week.len(), 7);
    let non_zero: Vec<_> = week.iter().filter(|s| s.minutes > 0).collect();
    assert_eq!(non_zero.len(), 2);
    assert_eq!(non_zero.iter().map(|s| s.minutes).sum::<u32>(), 75);
    assert_eq!(week.iter().filter(|s| s.minutes == 0).count(), 5);
    assert_eq!(game.today_minutes(), 30);
}

#[test]
fn recent_sessions_are_most_recent_first() {
    let db = Database::open_memory().unwrap();
    let user = db.current_user().unwrap();
    for days_ago in [3, 1, 0] {
        record_session(&db, user, days_ago, 10);
    }
    let recent = db.recent_sessions(user, 2).unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent[0].started_at > recent[1].started_at);
}

#[test]
fn club_leaderboard_ranks_member_profiles() {
    let db = Database::open_memory().unwrap();
    let creator = Uuid::new_v4();
    db.get_or_create_profile(creator).unwrap();
    db.add_focus_minutes(creator, 40).unwrap();
    let club = db.create_club("Library Crew", Some("Quiet focus"), creator).unwrap();

    let rival = Uuid::new_v4();
    db.get_or_create_profile(rival).unwrap();
    db.add_focus_minutes(rival, 90).unwrap();
    db.join_club(club.id, rival).unwrap();

    let members = db.club_members(club.id).unwrap();
    let board = leaderboard::rank_club(members);
    assert_eq!(board[0].total_focus_minutes, 90);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[1].total_focus_minutes, 40);
    assert_eq!(board[1].rank, 2);
}
