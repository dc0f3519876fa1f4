//! HTTP transport implementation.
//!
//! Talks JSON to a Ticklist server over `reqwest`.

use crate::error::{SyncError, SyncResult};
use crate::transport::TaskApi;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Response};
use ticklist_protocol::{task_path, NewTask, Task, TaskId, TASKS_PATH};

/// HTTP-based task API.
pub struct HttpTransport {
    /// Base URL of the server (e.g., "http://127.0.0.1:5000").
    base_url: String,
    client: Client,
    last_error: RwLock<Option<String>>,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a transport over an existing client.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the message of the most recent failed call, if the last call
    /// failed.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn record<T>(&self, result: SyncResult<T>) -> SyncResult<T> {
        match &result {
            Ok(_) => *self.last_error.write() = None,
            Err(e) => {
                tracing::debug!(base_url = %self.base_url, error = %e, "request failed");
                *self.last_error.write() = Some(e.to_string());
            }
        }
        result
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn check_status(response: Response) -> SyncResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SyncError::Status {
            status: status.as_u16(),
        })
    }
}

impl HttpTransport {
    async fn fetch_all(&self) -> SyncResult<Vec<Task>> {
        let response = self.client.get(self.url(TASKS_PATH)).send().await?;
        Ok(check_status(response)?.json().await?)
    }

    async fn post_task(&self, new_task: &NewTask) -> SyncResult<Task> {
        let response = self
            .client
            .post(self.url(TASKS_PATH))
            .json(new_task)
            .send()
            .await?;
        Ok(check_status(response)?.json().await?)
    }

    // The body carries the whole task, id included.
    async fn put_task(&self, task: &Task) -> SyncResult<Task> {
        let response = self
            .client
            .put(self.url(&task_path(&task.id)))
            .json(task)
            .send()
            .await?;
        Ok(check_status(response)?.json().await?)
    }

    // Only the status matters; the acknowledgement body is not inspected.
    async fn delete_task(&self, id: &TaskId) -> SyncResult<()> {
        let response = self.client.delete(self.url(&task_path(id))).send().await?;
        check_status(response)?;
        Ok(())
    }
}

#[async_trait]
impl TaskApi for HttpTransport {
    async fn list(&self) -> SyncResult<Vec<Task>> {
        self.record(self.fetch_all().await)
    }

    async fn create(&self, new_task: &NewTask) -> SyncResult<Task> {
        self.record(self.post_task(new_task).await)
    }

    async fn update(&self, task: &Task) -> SyncResult<Task> {
        self.record(self.put_task(task).await)
    }

    async fn delete(&self, id: &TaskId) -> SyncResult<()> {
        self.record(self.delete_task(id).await)
    }
}
