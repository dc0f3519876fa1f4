//! In-memory task store.

use crate::error::{StoreError, StoreResult};
use crate::store::TaskStore;
use parking_lot::RwLock;
use ticklist_protocol::{NewTask, Task, TaskId, TaskUpdate};

/// An in-memory task store.
///
/// Nothing survives the process. Suitable for tests and for running the
/// server without a data directory.
///
/// # Example
///
/// ```rust
/// use ticklist_protocol::{NewTask, TaskUpdate};
/// use ticklist_store::{InMemoryStore, TaskStore};
///
/// let store = InMemoryStore::new();
/// let task = store.insert(NewTask::new("water plants")).unwrap();
/// let done = store
///     .update(&task.id, TaskUpdate { text: None, completed: Some(true) })
///     .unwrap();
/// assert!(done.completed);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }
}

impl TaskStore for InMemoryStore {
    fn list(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.read().clone())
    }

    fn get(&self, id: &TaskId) -> StoreResult<Task> {
        self.tasks
            .read()
            .iter()
            .find(|task| &task.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn insert(&self, new_task: NewTask) -> StoreResult<Task> {
        new_task.validate()?;
        let task = Task::new(TaskId::generate(), new_task.text);
        self.tasks.write().push(task.clone());
        Ok(task)
    }

    fn update(&self, id: &TaskId, update: TaskUpdate) -> StoreResult<Task> {
        update.validate()?;
        let mut tasks = self.tasks.write();
        let task = tasks
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        update.apply_to(task);
        Ok(task.clone())
    }

    fn remove(&self, id: &TaskId) -> StoreResult<Task> {
        let mut tasks = self.tasks.write();
        let index = tasks
            .iter()
            .position(|task| &task.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(tasks.remove(index))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.tasks.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_id_and_defaults() {
        let store = InMemoryStore::new();
        let task = store.insert(NewTask::new("buy milk")).unwrap();

        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
        assert!(!task.id.is_temporary());
        assert_eq!(store.get(&task.id).unwrap(), task);
    }

    #[test]
    fn insert_rejects_blank_text() {
        let store = InMemoryStore::new();
        let result = store.insert(NewTask::new("   "));
        assert!(matches!(result, Err(StoreError::InvalidTask(_))));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let store = InMemoryStore::new();
        let a = store.insert(NewTask::new("a")).unwrap();
        let b = store.insert(NewTask::new("b")).unwrap();
        let c = store.insert(NewTask::new("c")).unwrap();

        store.remove(&b.id).unwrap();
        let d = store.insert(NewTask::new("d")).unwrap();

        assert_eq!(store.list().unwrap(), vec![a, c, d]);
    }

    #[test]
    fn update_in_place() {
        let store = InMemoryStore::new();
        let a = store.insert(NewTask::new("a")).unwrap();
        let b = store.insert(NewTask::new("b")).unwrap();

        let updated = store
            .update(&a.id, TaskUpdate::from_task(&a.clone().with_completed(true)))
            .unwrap();
        assert!(updated.completed);
        assert_eq!(store.list().unwrap(), vec![updated, b]);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = InMemoryStore::new();
        let missing = TaskId::new("nope");

        assert!(matches!(store.get(&missing), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(&missing, TaskUpdate::default()),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.remove(&missing), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn with_tasks_seeds_store() {
        let seeded = Task::new(TaskId::new("42"), "x");
        let store = InMemoryStore::with_tasks(vec![seeded.clone()]);
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get(&TaskId::new("42")).unwrap(), seeded);
    }
}
