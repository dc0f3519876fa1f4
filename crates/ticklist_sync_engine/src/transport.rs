//! Transport layer abstraction for task API calls.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use ticklist_protocol::{NewTask, Task, TaskId, TaskUpdate};
use tokio::sync::watch;

/// The remote task API the engine synchronizes against.
///
/// This trait abstracts the network layer so the engine can run over HTTP
/// or against an in-process mock.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches every task.
    async fn list(&self) -> SyncResult<Vec<Task>>;

    /// Creates a task and returns it with its server-assigned id.
    async fn create(&self, new_task: &NewTask) -> SyncResult<Task>;

    /// Writes the task's fields and returns the stored result.
    async fn update(&self, task: &Task) -> SyncResult<Task>;

    /// Deletes the task with the given id.
    async fn delete(&self, id: &TaskId) -> SyncResult<()>;
}

#[async_trait]
impl<T: TaskApi + ?Sized> TaskApi for Arc<T> {
    async fn list(&self) -> SyncResult<Vec<Task>> {
        (**self).list().await
    }

    async fn create(&self, new_task: &NewTask) -> SyncResult<Task> {
        (**self).create(new_task).await
    }

    async fn update(&self, task: &Task) -> SyncResult<Task> {
        (**self).update(task).await
    }

    async fn delete(&self, id: &TaskId) -> SyncResult<()> {
        (**self).delete(id).await
    }
}

/// A request seen by [`MockTaskApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `list`
    List,
    /// `create` with the submitted text.
    Create(String),
    /// `update` with the submitted task.
    Update(Task),
    /// `delete`
    Delete(TaskId),
}

#[derive(Debug, Default)]
struct MockState {
    tasks: Vec<Task>,
    next_id: u64,
    offline: bool,
    fail_next: usize,
    calls: Vec<ApiCall>,
}

/// An in-process task API for testing.
///
/// Keeps its own task list and answers like the real server. Failures can
/// be scripted with [`set_offline`](Self::set_offline) and
/// [`fail_next`](Self::fail_next), and [`hold`](Self::hold) parks every
/// response until [`release`](Self::release) so in-flight state can be
/// inspected. The outcome of a held call is decided when it is released.
#[derive(Debug)]
pub struct MockTaskApi {
    state: Mutex<MockState>,
    held: watch::Sender<bool>,
    requests: watch::Sender<usize>,
}

impl Default for MockTaskApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskApi {
    /// Creates an empty mock API.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1,
                ..MockState::default()
            }),
            held: watch::channel(false).0,
            requests: watch::channel(0).0,
        }
    }

    /// Creates a mock API holding the given tasks.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let api = Self::new();
        api.state.lock().tasks = tasks;
        api
    }

    /// Returns the tasks as the server currently stores them.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Makes every subsequent call fail until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Makes the next `count` calls fail with a server error.
    pub fn fail_next(&self, count: usize) {
        self.state.lock().fail_next = count;
    }

    /// Parks responses until [`release`](Self::release) is called.
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    /// Lets parked and future responses through.
    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    /// Returns the number of calls received so far.
    pub fn request_count(&self) -> usize {
        *self.requests.borrow()
    }

    /// Waits until at least `count` calls have been received.
    pub async fn wait_for_requests(&self, count: usize) {
        let mut rx = self.requests.subscribe();
        let _ = rx.wait_for(|seen| *seen >= count).await;
    }

    async fn exchange(&self, call: ApiCall) -> SyncResult<()> {
        self.state.lock().calls.push(call);
        self.requests.send_modify(|seen| *seen += 1);

        let mut rx = self.held.subscribe();
        let _ = rx.wait_for(|held| !*held).await;

        let mut state = self.state.lock();
        if state.offline {
            return Err(SyncError::Offline);
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(SyncError::Status { status: 500 });
        }
        Ok(())
    }
}

#[async_trait]
impl TaskApi for MockTaskApi {
    async fn list(&self) -> SyncResult<Vec<Task>> {
        self.exchange(ApiCall::List).await?;
        Ok(self.tasks())
    }

    async fn create(&self, new_task: &NewTask) -> SyncResult<Task> {
        self.exchange(ApiCall::Create(new_task.text.clone())).await?;
        if new_task.validate().is_err() {
            return Err(SyncError::Status { status: 400 });
        }

        let mut state = self.state.lock();
        let id = loop {
            let candidate = TaskId::new(state.next_id.to_string());
            state.next_id += 1;
            if !state.tasks.iter().any(|t| t.id == candidate) {
                break candidate;
            }
        };
        let task = Task::new(id, new_task.text.clone());
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task) -> SyncResult<Task> {
        self.exchange(ApiCall::Update(task.clone())).await?;

        let mut state = self.state.lock();
        let stored = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(SyncError::Status { status: 404 })?;
        TaskUpdate::from_task(task).apply_to(stored);
        Ok(stored.clone())
    }

    async fn delete(&self, id: &TaskId) -> SyncResult<()> {
        self.exchange(ApiCall::Delete(id.clone())).await?;

        let mut state = self.state.lock();
        let before = state.tasks.len();
        state.tasks.retain(|t| &t.id != id);
        if state.tasks.len() == before {
            return Err(SyncError::Status { status: 404 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_behaves_like_a_store() {
        let api = MockTaskApi::new();
        let created = api.create(&NewTask::new("write tests")).await.unwrap();
        assert_eq!(created.id.as_str(), "1");
        assert!(!created.completed);

        let updated = api
            .update(&created.clone().with_completed(true))
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(api.list().await.unwrap(), vec![updated]);

        api.delete(&created.id).await.unwrap();
        assert!(api.list().await.unwrap().is_empty());
        assert_eq!(api.request_count(), 5);
    }

    #[tokio::test]
    async fn mock_unknown_ids_are_rejected() {
        let api = MockTaskApi::new();
        let ghost = Task::new(TaskId::new("ghost"), "boo");

        let err = api.update(&ghost).await.unwrap_err();
        assert!(err.is_rejection());
        let err = api.delete(&ghost.id).await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn mock_offline() {
        let api = MockTaskApi::with_tasks(vec![Task::new(TaskId::new("1"), "a")]);
        api.set_offline(true);
        assert!(matches!(api.list().await, Err(SyncError::Offline)));

        api.set_offline(false);
        assert_eq!(api.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mock_fail_next_counts_down() {
        let api = MockTaskApi::new();
        api.fail_next(2);

        assert!(api.list().await.is_err());
        assert!(api.create(&NewTask::new("x")).await.is_err());
        assert!(api.list().await.unwrap().is_empty());
        assert_eq!(
            api.calls(),
            vec![ApiCall::List, ApiCall::Create("x".into()), ApiCall::List]
        );
    }

    #[tokio::test]
    async fn mock_hold_parks_responses() {
        let api = Arc::new(MockTaskApi::new());
        api.hold();

        let call = tokio::spawn({
            let api = Arc::clone(&api);
            async move { api.create(&NewTask::new("parked")).await }
        });

        api.wait_for_requests(1).await;
        assert!(api.tasks().is_empty());

        api.release();
        let task = call.await.unwrap().unwrap();
        assert_eq!(api.tasks(), vec![task]);
    }
}
