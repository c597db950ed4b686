mod common;

use rusqlite::Connection;
use taskjournal_core::db::migrations::{current_user_version, latest_version, JOURNAL_TABLES};
use taskjournal_core::db::{initialize_schema, open_db};
use taskjournal_core::{DbError, Journal, ListView, NewTask, RepoError};

#[test]
fn fresh_store_gets_every_table_and_version_one() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("journal.db")).unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), 1);
    assert_eq!(latest_version(), 1);
    for table in JOURNAL_TABLES {
        let exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1, "missing table {table}");
    }
}

#[test]
fn journal_file_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    let task_id = {
        let mut journal = Journal::open(&path).unwrap();
        journal.set_metadata("journal_name", "Home").unwrap();
        let list_id = journal.add_list("Inbox", None).unwrap();
        let task_id = journal.add_task(&NewTask::new("Water plants")).unwrap();
        journal.add_task_to_list(task_id, list_id).unwrap();
        journal.close().unwrap();
        task_id
    };

    let journal = Journal::open(&path).unwrap();
    assert_eq!(journal.journal_name().unwrap().as_deref(), Some("Home"));
    let task = journal.get_task(task_id).unwrap().unwrap();
    assert_eq!(task.description, "Water plants");
    assert_eq!(journal.count(ListView::Pending).unwrap(), 1);
}

#[test]
fn initialize_schema_is_a_noop_on_current_store() {
    let mut conn = common::seeded_connection();
    initialize_schema(&mut conn).unwrap();

    let tasks: i64 = conn
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tasks, 18);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 7;").unwrap();
    }

    let err = match Journal::open(&path) {
        Ok(_) => panic!("future schema must be rejected"),
        Err(err) => err,
    };
    assert!(matches!(
        err,
        RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1
        })
    ));
}

#[test]
fn attaching_to_uninitialized_connection_fails() {
    let conn = Connection::open_in_memory().unwrap();
    let err = match Journal::from_connection(conn) {
        Ok(_) => panic!("uninitialized store must be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, RepoError::MissingRequiredTable("metadata")));
}

#[test]
fn metadata_round_trips_and_overwrites() {
    let mut journal = common::seeded_journal();
    assert_eq!(journal.journal_name().unwrap().as_deref(), Some("Test1"));
    assert_eq!(journal.get_metadata("theme").unwrap(), None);

    journal.set_metadata("theme", "dark").unwrap();
    journal.set_metadata("journal_name", "Renamed").unwrap();

    assert_eq!(journal.get_metadata("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(journal.journal_name().unwrap().as_deref(), Some("Renamed"));
}

#[test]
fn in_memory_journal_starts_empty() {
    let journal = Journal::open_in_memory().unwrap();
    assert!(journal.lists().unwrap().is_empty());
    assert!(journal.tags().unwrap().is_empty());
    assert_eq!(journal.count(ListView::Pending).unwrap(), 0);
    assert_eq!(journal.journal_name().unwrap(), None);
    journal.close().unwrap();
}
