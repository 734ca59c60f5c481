use chrono::{Duration, NaiveDate};
use habithero_core::db::open_db_in_memory;
use habithero_core::{
    build_history, CompletionRepository, Habit, HabitRepository, MissionService,
    SqliteCompletionRepository, SqliteHabitRepository, HISTORY_WINDOW_DAYS,
};
use rusqlite::Connection;
use uuid::Uuid;

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

fn seed_habits(conn: &Connection, child: Uuid, count: usize) -> Vec<Habit> {
    let repo = SqliteHabitRepository::try_new(conn).unwrap();
    let habits: Vec<Habit> = (0..count)
        .map(|index| Habit::new(child, format!("Mission {index}"), "⭐", index as i64))
        .collect();
    repo.create_habits(&habits).unwrap();
    habits
}

#[test]
fn window_has_exact_length_and_contiguous_descending_dates() {
    let conn = open_db_in_memory().unwrap();
    let child = Uuid::new_v4();
    seed_habits(&conn, child, 2);

    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let reference = date("2024-03-14");
    let history =
        build_history(&habits, &log, child, HISTORY_WINDOW_DAYS, reference).unwrap();

    assert_eq!(history.len(), 14);
    assert_eq!(history[0].date, reference);
    for pair in history.windows(2) {
        assert_eq!(pair[0].date - pair[1].date, Duration::days(1));
    }
}

#[test]
fn days_without_records_yield_zero_completed() {
    let conn = open_db_in_memory().unwrap();
    let child = Uuid::new_v4();
    let missions = seed_habits(&conn, child, 2);

    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let reference = date("2024-03-14");
    // Complete both habits on the reference day, one the day before,
    // nothing earlier.
    log.set_completion(child, missions[0].id, reference, true)
        .unwrap();
    log.set_completion(child, missions[1].id, reference, true)
        .unwrap();
    log.set_completion(child, missions[0].id, reference - Duration::days(1), true)
        .unwrap();

    let history = build_history(&habits, &log, child, 3, reference).unwrap();

    assert_eq!(history[0].completed_count, 2);
    assert!(history[0].fully_completed);
    assert_eq!(history[1].completed_count, 1);
    assert!(!history[1].fully_completed);
    assert_eq!(history[2].completed_count, 0);
    assert_eq!(history[2].total_count, 2);
}

#[test]
fn range_bounds_are_inclusive_on_the_oldest_day() {
    let conn = open_db_in_memory().unwrap();
    let child = Uuid::new_v4();
    let missions = seed_habits(&conn, child, 1);

    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let reference = date("2024-03-14");
    let oldest = reference - Duration::days(13);
    log.set_completion(child, missions[0].id, oldest, true)
        .unwrap();
    // One day beyond the window must not leak in.
    log.set_completion(child, missions[0].id, oldest - Duration::days(1), true)
        .unwrap();

    let history = build_history(&habits, &log, child, 14, reference).unwrap();
    assert_eq!(history.len(), 14);
    assert_eq!(history[13].date, oldest);
    assert_eq!(history[13].completed_count, 1);
}

#[test]
fn zero_window_returns_empty_history() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let history =
        build_history(&habits, &log, Uuid::new_v4(), 0, date("2024-03-14")).unwrap();
    assert!(history.is_empty());
}

#[test]
fn deleted_habits_shrink_past_totals_retroactively() {
    let conn = open_db_in_memory().unwrap();
    let child = Uuid::new_v4();
    let missions = seed_habits(&conn, child, 3);
    let service = MissionService::new(&conn);

    let reference = date("2024-03-14");
    let yesterday = reference - Duration::days(1);
    for mission in &missions {
        service
            .toggle_habit(child, mission.id, yesterday, true)
            .unwrap();
    }

    let before = service.history(child, 2, reference).unwrap();
    assert_eq!(before[1].total_count, 3);
    assert!(before[1].fully_completed);

    // The registry snapshot is "as of now": removing a habit rewrites the
    // past window's totals on the next read.
    let habit_repo = SqliteHabitRepository::try_new(&conn).unwrap();
    habit_repo.delete_habit(missions[2].id).unwrap();

    let after = service.history(child, 2, reference).unwrap();
    assert_eq!(after[1].total_count, 2);
    assert_eq!(after[1].completed_count, 2);
    assert!(after[1].fully_completed);
}
