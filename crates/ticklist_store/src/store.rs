//! Task store trait definition.

use crate::error::StoreResult;
use ticklist_protocol::{NewTask, Task, TaskId, TaskUpdate};

/// The persistent task collection.
///
/// # Invariants
///
/// - `insert` assigns a fresh, never reused id and `completed = false`
/// - `list` returns tasks in insertion order
/// - `update` and `remove` of an unknown id fail with
///   [`crate::StoreError::NotFound`] and change nothing
/// - Stores must be `Send + Sync`; every method takes `&self`
///
/// # Implementors
///
/// - [`crate::InMemoryStore`] - For testing
/// - [`crate::FileStore`] - For persistent storage
pub trait TaskStore: Send + Sync {
    /// Returns every task in insertion order.
    fn list(&self) -> StoreResult<Vec<Task>>;

    /// Returns the task with the given id.
    fn get(&self, id: &TaskId) -> StoreResult<Task>;

    /// Creates a task from `new_task` and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::InvalidTask`] if the text is blank.
    fn insert(&self, new_task: NewTask) -> StoreResult<Task>;

    /// Applies `update` to the task with the given id and returns the result.
    fn update(&self, id: &TaskId, update: TaskUpdate) -> StoreResult<Task>;

    /// Removes the task with the given id and returns its last value.
    fn remove(&self, id: &TaskId) -> StoreResult<Task>;

    /// Returns the number of tasks.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    /// Returns true if the store holds no tasks.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: TaskStore + ?Sized> TaskStore for std::sync::Arc<S> {
    fn list(&self) -> StoreResult<Vec<Task>> {
        (**self).list()
    }

    fn get(&self, id: &TaskId) -> StoreResult<Task> {
        (**self).get(id)
    }

    fn insert(&self, new_task: NewTask) -> StoreResult<Task> {
        (**self).insert(new_task)
    }

    fn update(&self, id: &TaskId, update: TaskUpdate) -> StoreResult<Task> {
        (**self).update(id, update)
    }

    fn remove(&self, id: &TaskId) -> StoreResult<Task> {
        (**self).remove(id)
    }

    fn len(&self) -> StoreResult<usize> {
        (**self).len()
    }
}
