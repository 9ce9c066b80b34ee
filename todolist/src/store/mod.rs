//! Task storage. The [`TaskStore`] trait is the seam between front-ends and
//! persistence: the interactive CLI runs on [`MemoryStore`] and the HTTP
//! service on [`SqliteStore`].

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::model::Task;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The id matched no live task. Client-correctable.
    #[error("task {0} not found")]
    NotFound(i64),
    /// Opaque persistence failure from the underlying engine.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// CRUD capability over `Task` records, shared by both front-ends.
///
/// Ids grow monotonically and are never reused. Every new task starts with
/// [`crate::model::DEFAULT_STATUS`].
pub trait TaskStore {
    /// Allocates the next id and appends a task with the default status.
    fn create(&mut self, title: &str) -> Result<Task, StoreError>;

    /// All live tasks in insertion order. An empty store yields an empty vec.
    fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// The task with the given id, or `NotFound`.
    fn find(&self, id: i64) -> Result<Task, StoreError>;

    /// Overwrites `status` only (any string is accepted verbatim, the empty
    /// string included) and returns the updated record.
    fn update_status(&mut self, id: i64, status: &str) -> Result<Task, StoreError>;

    /// Removes the task from all future reads. Deleting the same id twice
    /// fails with `NotFound` on the second call.
    fn delete(&mut self, id: i64) -> Result<(), StoreError>;
}
