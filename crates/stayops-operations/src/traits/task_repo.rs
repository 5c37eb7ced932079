use chrono::{DateTime, Utc};
use stayops_core::{TaskRecord, TaskStatus};

use crate::Result;

/// Status change applied to every open task matching a key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub status: TaskStatus,
    pub actor_id: String,
    pub at: DateTime<Utc>,
}

pub trait TaskRepo {
    /// # Errors
    ///
    /// Returns an error if the task cannot be written.
    fn create_task(&self, task: &TaskRecord) -> Result<()>;

    /// Applies `update` to every `OPEN` task whose key starts with `prefix`
    /// and returns how many were changed. Zero matches is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the tasks cannot be written.
    fn bulk_update_tasks_by_key_prefix(&self, prefix: &str, update: &TaskUpdate) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the tasks cannot be read.
    fn tasks_by_key_prefix(&self, prefix: &str) -> Result<Vec<TaskRecord>>;
}
