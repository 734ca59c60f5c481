use chrono::NaiveDate;
use habithero_core::db::open_db_in_memory;
use habithero_core::{
    CompletionRepository, Habit, HabitRepository, RepoError, SqliteCompletionRepository,
    SqliteHabitRepository,
};
use uuid::Uuid;

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

#[test]
fn set_completion_creates_then_updates_in_place() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let child = Uuid::new_v4();
    let habit = Habit::new(child, "Brush teeth", "🦷", 0);
    habits.create_habit(&habit).unwrap();

    let day = date("2024-03-01");
    let created = log.set_completion(child, habit.id, day, true).unwrap();
    assert!(created.completed);
    assert_eq!(created.date, day);

    let toggled_off = log.set_completion(child, habit.id, day, false).unwrap();
    assert!(!toggled_off.completed);
    // The upsert keeps the original row identity.
    assert_eq!(toggled_off.id, created.id);

    let rows = log.completions_for_date(child, day).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn set_completion_is_idempotent_for_repeated_calls() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let child = Uuid::new_v4();
    let habit = Habit::new(child, "Make the bed", "🛏️", 0);
    habits.create_habit(&habit).unwrap();

    let day = date("2024-03-01");
    let first = log.set_completion(child, habit.id, day, true).unwrap();
    let second = log.set_completion(child, habit.id, day, true).unwrap();
    assert_eq!(first, second);

    let rows = log.completions_for_date(child, day).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].completed);
}

#[test]
fn set_completion_for_unknown_habit_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = log
        .set_completion(Uuid::new_v4(), missing, date("2024-03-01"), true)
        .unwrap_err();
    assert!(matches!(err, RepoError::HabitNotFound(id) if id == missing));
}

#[test]
fn completions_for_date_only_returns_that_date_and_child() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let child = Uuid::new_v4();
    let other_child = Uuid::new_v4();
    let habit = Habit::new(child, "Get dressed", "👕", 0);
    let other_habit = Habit::new(other_child, "Get dressed", "👕", 0);
    habits.create_habit(&habit).unwrap();
    habits.create_habit(&other_habit).unwrap();

    log.set_completion(child, habit.id, date("2024-03-01"), true)
        .unwrap();
    log.set_completion(child, habit.id, date("2024-03-02"), true)
        .unwrap();
    log.set_completion(other_child, other_habit.id, date("2024-03-01"), true)
        .unwrap();

    let rows = log.completions_for_date(child, date("2024-03-01")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].child_id, child);
    assert_eq!(rows[0].date, date("2024-03-01"));
}

#[test]
fn range_query_is_inclusive_and_date_descending() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let child = Uuid::new_v4();
    let habit = Habit::new(child, "Eat breakfast", "🍳", 0);
    habits.create_habit(&habit).unwrap();

    for day in ["2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"] {
        log.set_completion(child, habit.id, date(day), true).unwrap();
    }

    let rows = log
        .completions_in_range(child, date("2024-02-29"), date("2024-03-01"))
        .unwrap();
    let dates: Vec<NaiveDate> = rows.iter().map(|record| record.date).collect();
    assert_eq!(dates, vec![date("2024-03-01"), date("2024-02-29")]);
}

#[test]
fn duplicate_rows_for_one_habit_date_fail_loudly() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let child = Uuid::new_v4();
    let habit = Habit::new(child, "Pack backpack", "🎒", 0);
    habits.create_habit(&habit).unwrap();
    log.set_completion(child, habit.id, date("2024-03-01"), true)
        .unwrap();

    // Corrupt the log behind the unique index's back.
    conn.execute("DROP INDEX idx_habit_logs_habit_date;", [])
        .unwrap();
    conn.execute(
        "INSERT INTO habit_logs (id, child_id, habit_id, date, completed)
         VALUES (?1, ?2, ?3, '2024-03-01', 0);",
        [
            Uuid::new_v4().to_string(),
            child.to_string(),
            habit.id.to_string(),
        ],
    )
    .unwrap();

    let err = log
        .completions_for_date(child, date("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvariantViolation(_)));

    let err = log
        .completions_in_range(child, date("2024-03-01"), date("2024-03-01"))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvariantViolation(_)));
}

#[test]
fn records_survive_habit_deletion_as_orphans() {
    let conn = open_db_in_memory().unwrap();
    let habits = SqliteHabitRepository::try_new(&conn).unwrap();
    let log = SqliteCompletionRepository::try_new(&conn).unwrap();

    let child = Uuid::new_v4();
    let habit = Habit::new(child, "Check schedule", "📅", 0);
    habits.create_habit(&habit).unwrap();
    log.set_completion(child, habit.id, date("2024-03-01"), true)
        .unwrap();

    habits.delete_habit(habit.id).unwrap();

    let rows = log.completions_for_date(child, date("2024-03-01")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].habit_id, habit.id);
}
