use crate::model::{Task, DEFAULT_STATUS};
use crate::store::{StoreError, TaskStore};

/// Vec-backed store for the interactive CLI. Ids count up from 1 and are
/// never reused, matching what the SQLite rowid allocator does on a fresh
/// database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: i64) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl TaskStore for MemoryStore {
    fn create(&mut self, title: &str) -> Result<Task, StoreError> {
        self.next_id += 1;
        let task = Task {
            id: self.next_id,
            title: title.to_owned(),
            status: DEFAULT_STATUS.to_owned(),
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.clone())
    }

    fn find(&self, id: i64) -> Result<Task, StoreError> {
        let pos = self.position(id)?;
        Ok(self.tasks[pos].clone())
    }

    fn update_status(&mut self, id: i64, status: &str) -> Result<Task, StoreError> {
        let pos = self.position(id)?;
        self.tasks[pos].status = status.to_owned();
        Ok(self.tasks[pos].clone())
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let pos = self.position(id)?;
        self.tasks.remove(pos);
        Ok(())
    }
}
