use rusqlite::{Connection, OptionalExtension};

use crate::model::{Task, DEFAULT_STATUS};
use crate::store::{StoreError, TaskStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id         INTEGER PRIMARY KEY,
    title      TEXT NOT NULL,
    status     TEXT NOT NULL DEFAULT 'Pending',
    deleted_at TEXT
);
";

fn set_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        status: row.get(2)?,
    })
}

/// SQLite-backed store. Deletes are soft: `delete` stamps `deleted_at` and
/// every read filters on `deleted_at IS NULL`, so an id stays burned once
/// deleted and the row survives in the file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens the database at `path`, creating file and schema if needed.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Fresh private in-memory database, mainly for tests.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        set_pragmas(&conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl TaskStore for SqliteStore {
    fn create(&mut self, title: &str) -> Result<Task, StoreError> {
        self.conn.execute(
            "INSERT INTO tasks (title, status) VALUES (?1, ?2)",
            rusqlite::params![title, DEFAULT_STATUS],
        )?;
        self.find(self.conn.last_insert_rowid())
    }

    fn list(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, status FROM tasks WHERE deleted_at IS NULL ORDER BY id")?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    fn find(&self, id: i64) -> Result<Task, StoreError> {
        self.conn
            .query_row(
                "SELECT id, title, status FROM tasks WHERE id = ?1 AND deleted_at IS NULL",
                [id],
                row_to_task,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    fn update_status(&mut self, id: i64, status: &str) -> Result<Task, StoreError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            rusqlite::params![status, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        self.find(id)
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET deleted_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now') \
             WHERE id = ?1 AND deleted_at IS NULL",
            [id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_returns_stored_row() {
        let mut store = SqliteStore::open_memory().unwrap();
        let task = store.create("Buy milk").unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, DEFAULT_STATUS);
    }

    #[test]
    fn list_skips_deleted_and_orders_by_id() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create("a").unwrap();
        store.create("b").unwrap();
        store.create("c").unwrap();
        store.delete(2).unwrap();
        let ids: Vec<i64> = store.list().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn find_after_delete_is_not_found() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create("gone").unwrap();
        store.delete(1).unwrap();
        assert!(matches!(store.find(1), Err(StoreError::NotFound(1))));
    }

    #[test]
    fn update_status_rereads_the_row() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create("Buy milk").unwrap();
        let task = store.update_status(1, "Completed").unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, "Completed");
    }

    #[test]
    fn update_on_deleted_row_is_not_found() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create("gone").unwrap();
        store.delete(1).unwrap();
        assert!(matches!(
            store.update_status(1, "Completed"),
            Err(StoreError::NotFound(1))
        ));
    }

    #[test]
    fn delete_keeps_the_row_in_the_table() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create("kept").unwrap();
        store.delete(1).unwrap();
        let total: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(total, 1);
        let stamped: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM tasks WHERE deleted_at IS NOT NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stamped, 1);
    }

    #[test]
    fn double_delete_is_not_found() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create("once").unwrap();
        store.delete(1).unwrap();
        assert!(matches!(store.delete(1), Err(StoreError::NotFound(1))));
    }

    #[test]
    fn ids_keep_growing_past_deleted_rows() {
        let mut store = SqliteStore::open_memory().unwrap();
        store.create("first").unwrap();
        store.delete(1).unwrap();
        let next = store.create("second").unwrap();
        assert_eq!(next.id, 2);
    }
}
