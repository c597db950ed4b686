#![allow(dead_code)]

use chrono::DateTime;
use rusqlite::Connection;
use taskjournal_core::db::initialize_schema;
use taskjournal_core::{Journal, Timestamp};

const SEED_SQL: &str = r#"
INSERT INTO metadata (property, value) VALUES ('journal_name', 'Test1');

INSERT INTO lists (list_id, name, icon, position) VALUES
    (1, 'Focus', 'emblem-default-symbolic', 1),
    (2, 'Inbox', 'emblem-default-symbolic', 2),
    (3, 'Next', 'emblem-default-symbolic', 3),
    (4, 'Waiting', 'emblem-default-symbolic', 4),
    (5, 'Scheduled', 'emblem-default-symbolic', 5),
    (6, 'Someday/Maybe', 'emblem-default-symbolic', 6);

INSERT INTO tags (tag_id, name, color) VALUES
    (1, '@errands', '#308bcc'),
    (2, '@phone', '#44c95c'),
    (3, 'home remodel 2020', '#8244c9'),
    (4, '@home', '#993333'),
    (5, 'project', NULL),
    (6, 'work', '#cc0066');

INSERT INTO tasks (task_id, position, description, notes, priority, creation_dtm, completion_dtm, start_dtm, due_dtm, is_trashed) VALUES
    (1, 1, 'Call mom', NULL, 5, '2020-06-01T17:30:05-04:00', NULL, '2020-06-15T12:30:00-04:00', NULL, 0),
    (2, 2, 'Buy groceries', 'eggs, flour, sugar', 1, '2020-06-01T17:30:15-04:00', NULL, NULL, NULL, 0),
    (3, 3, 'Build shed', NULL, -1, '2020-06-01T17:35:00-04:00', NULL, '2020-06-10', '2020-06-25T17:00:00-04:00', 0),
    (4, 4, 'Measure yard', NULL, 0, '2020-06-01T17:45:00-04:00', '2020-06-01T18:15:00-04:00', NULL, NULL, 0),
    (5, 5, 'Design shed', NULL, 0, '2020-06-01T17:46:00-04:00', NULL, NULL, NULL, 0),
    (6, 6, 'Buy lumber', NULL, 0, '2020-06-01T17:47:00-04:00', NULL, NULL, NULL, 0),
    (7, 7, 'Buy tools', NULL, 0, '2020-06-01T17:48:00-04:00', NULL, NULL, NULL, 0),
    (8, 8, 'Assemble shed', NULL, 0, '2020-06-01T17:49:00-04:00', NULL, NULL, NULL, 0),
    (9, 9, 'Purchase lawnmower', NULL, 0, '2020-06-01T17:55:00-04:00', NULL, NULL, NULL, 0),
    (10, 10, 'Install cool new game', NULL, 0, '2020-06-01T17:10:00-04:00', NULL, NULL, NULL, 1),
    (11, 11, 'Clean kitchen', NULL, 2, '2020-06-02T17:20:00-04:00', NULL, NULL, NULL, 0),
    (12, 12, 'Organize basement', NULL, -1, '2020-06-02T17:25:00-04:00', NULL, NULL, NULL, 0),
    (13, 13, 'Buy storage containers', NULL, 0, '2020-06-02T12:30:00-04:00', NULL, NULL, NULL, 0),
    (14, 14, 'Donate old TV', NULL, -1, '2020-06-01T19:23:00-04:00', NULL, NULL, NULL, 0),
    (15, 15, 'Waiting on Charlie to tell me if he wants TV', NULL, 0, '2020-06-03T10:08:20-04:00', NULL, NULL, NULL, 0),
    (16, 16, 'Learn Spanish', NULL, 0, '2020-06-01T15:02:00-04:00', NULL, NULL, NULL, 0),
    (17, 17, 'Call boss back on TPS reports', NULL, 0, '2020-06-02T09:32:47-04:00', NULL, NULL, NULL, 0),
    (18, 18, 'Buy christmas gifts', 'Mom - scarf, dad - mug', 0, '2020-06-05T13:30:25-04:00', NULL, NULL, NULL, 0);

INSERT INTO task_lists (list_id, task_id) VALUES
    (1, 1), (3, 1), (3, 2), (2, 4), (6, 9), (2, 10), (1, 11), (4, 15), (6, 16), (2, 18);

INSERT INTO task_tags (task_id, tag_id) VALUES
    (1, 2), (2, 1), (3, 3), (3, 4), (3, 5), (4, 4), (6, 1), (7, 1),
    (10, 4), (11, 4), (12, 4), (13, 1), (14, 1), (17, 2), (17, 6);

INSERT INTO task_relations (task_from_id, task_to_id, relationship) VALUES
    (3, 4, 'parent_of'),
    (3, 5, 'parent_of'),
    (3, 6, 'parent_of'),
    (3, 7, 'parent_of'),
    (3, 8, 'parent_of'),
    (9, 3, 'blocked_by'),
    (12, 13, 'parent_of'),
    (12, 14, 'parent_of'),
    (14, 15, 'blocked_by');

INSERT INTO task_attributes (task_id, attr_key, attr_type, attr_value) VALUES
    (1, 'time-needed-minutes', 'float', '32.5'),
    (5, 'energy-level', 'int', '3');
"#;

/// Initialized in-memory connection holding the sample journal.
pub fn seeded_connection() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    initialize_schema(&mut conn).unwrap();
    conn.execute_batch(SEED_SQL).unwrap();
    conn
}

pub fn seeded_journal() -> Journal {
    Journal::from_connection(seeded_connection()).unwrap()
}

pub fn ts(text: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(text).unwrap()
}

pub fn ids<'a>(tasks: impl IntoIterator<Item = &'a taskjournal_core::Task>) -> Vec<i64> {
    tasks.into_iter().map(|task| task.task_id).collect()
}

/// Journal with `count` open top-level tasks, one list per task, a shared
/// tag, an integer attribute per task and a dependency chain `i -> i + 1`.
pub fn bulk_journal(count: i64) -> Journal {
    let mut conn = Connection::open_in_memory().unwrap();
    initialize_schema(&mut conn).unwrap();
    conn.execute_batch(&format!(
        "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < {count})
         INSERT INTO tasks (task_id, position, description, priority, creation_dtm, is_trashed)
         SELECT i, i, 'bulk ' || i, 0, '2020-06-01T00:00:00+00:00', 0 FROM n;
         INSERT INTO lists (list_id, name, icon, position)
         SELECT task_id, 'list ' || task_id, NULL, task_id FROM tasks;
         INSERT INTO task_lists (list_id, task_id) SELECT task_id, task_id FROM tasks;
         INSERT INTO tags (tag_id, name, color) VALUES (1, 'bulk', NULL);
         INSERT INTO task_tags (task_id, tag_id) SELECT task_id, 1 FROM tasks;
         INSERT INTO task_attributes (task_id, attr_key, attr_type, attr_value)
         SELECT task_id, 'n', 'int', CAST(task_id AS TEXT) FROM tasks;
         INSERT INTO task_relations (task_from_id, task_to_id, relationship)
         SELECT task_id, task_id + 1, 'blocked_by' FROM tasks WHERE task_id < {count};"
    ))
    .unwrap();
    Journal::from_connection(conn).unwrap()
}
