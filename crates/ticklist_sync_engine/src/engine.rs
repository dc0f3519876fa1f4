//! The optimistic sync engine.

use crate::config::EngineConfig;
use crate::error::SyncError;
use crate::temp_id::TempIdGenerator;
use crate::transport::TaskApi;
use crate::view::{TaskView, ViewState};
use parking_lot::Mutex;
use std::sync::Arc;
use ticklist_protocol::{NewTask, TaskId};
use tokio::sync::watch;

/// How a mutation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the mutation.
    Confirmed,
    /// The request failed and the view was restored.
    RolledBack,
    /// Nothing was done (blank input).
    Skipped,
}

/// Counters over the engine's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Mutations the server confirmed.
    pub confirmed: u64,
    /// Mutations undone after a failed request.
    pub rolled_back: u64,
    /// Failed list loads.
    pub failed_loads: u64,
}

struct Inner {
    view: ViewState,
    stats: EngineStats,
    error_generation: u64,
}

/// View state shared between the engine, its clones and the error timers.
struct Shared {
    inner: Mutex<Inner>,
    changes: watch::Sender<ViewState>,
}

impl Shared {
    fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                view: ViewState::new(),
                stats: EngineStats::default(),
                error_generation: 0,
            }),
            changes: watch::channel(ViewState::new()).0,
        }
    }

    /// Applies `f` and publishes the resulting view as one step.
    fn update<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock();
        let result = f(&mut inner);
        self.changes.send_replace(inner.view.clone());
        result
    }

    fn read<R>(&self, f: impl FnOnce(&Inner) -> R) -> R {
        f(&self.inner.lock())
    }
}

/// Keeps the client's task list in step with the server, optimistically.
///
/// Each mutation shows its effect before the request is sent and settles
/// into either the server's answer or the prior state. A failed request
/// also shows an error notice that clears itself after
/// [`EngineConfig::error_display`]; a newer failure replaces the notice and
/// restarts the countdown.
///
/// The engine is cheap to clone. Clones share one view.
///
/// Operations must be awaited on a Tokio runtime, which drives the notice
/// timers.
pub struct SyncEngine<A> {
    api: Arc<A>,
    config: Arc<EngineConfig>,
    temp_ids: Arc<TempIdGenerator>,
    shared: Arc<Shared>,
}

impl<A> Clone for SyncEngine<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            config: Arc::clone(&self.config),
            temp_ids: Arc::clone(&self.temp_ids),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A: TaskApi> SyncEngine<A> {
    /// Creates an engine over `api`. The list starts empty and loading.
    pub fn new(api: A, config: EngineConfig) -> Self {
        Self {
            api: Arc::new(api),
            config: Arc::new(config),
            temp_ids: Arc::new(TempIdGenerator::new()),
            shared: Arc::new(Shared::new()),
        }
    }

    /// Returns the API the engine talks to.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns a copy of the whole view.
    pub fn snapshot(&self) -> ViewState {
        self.shared.read(|inner| inner.view.clone())
    }

    /// Returns the tasks in display order.
    pub fn tasks(&self) -> Vec<TaskView> {
        self.shared.read(|inner| inner.view.tasks.clone())
    }

    /// Returns the visible error notice.
    pub fn error_message(&self) -> Option<String> {
        self.shared.read(|inner| inner.view.error_message.clone())
    }

    /// Returns true until the first load settles.
    pub fn is_loading_initial(&self) -> bool {
        self.shared.read(|inner| inner.view.is_loading_initial)
    }

    /// Returns true while a create is in flight.
    pub fn is_submitting(&self) -> bool {
        self.shared.read(|inner| inner.view.is_submitting)
    }

    /// Returns the lifetime counters.
    pub fn stats(&self) -> EngineStats {
        self.shared.read(|inner| inner.stats)
    }

    /// Subscribes to view changes. Every update publishes a new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.changes.subscribe()
    }

    /// Sets the new-task input text.
    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.update(|inner| inner.view.draft = text);
    }

    /// Replaces the list with the server's.
    ///
    /// On failure the list is left as it was and the load notice is shown.
    /// Either way the initial-loading flag is cleared.
    pub async fn load_all(&self) -> Outcome {
        let result = self.api.list().await;
        match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "tasks loaded");
                self.shared.update(|inner| {
                    inner.view.replace_all(tasks);
                    inner.view.is_loading_initial = false;
                });
                Outcome::Confirmed
            }
            Err(e) => {
                self.shared.update(|inner| {
                    inner.view.is_loading_initial = false;
                    inner.stats.failed_loads += 1;
                });
                self.report_failure(&self.config.messages.load, &e);
                Outcome::RolledBack
            }
        }
    }

    /// Adds a task.
    ///
    /// Blank text (after trimming) is ignored without a request. Otherwise a
    /// pending placeholder under a temporary id is appended at once and
    /// swapped for the server's task when it arrives.
    pub async fn create(&self, text: &str) -> Outcome {
        if text.trim().is_empty() {
            return Outcome::Skipped;
        }

        let (temp_id, pending) = self.shared.update(|inner| {
            let temp_id = self.temp_ids.next_unused(|id| inner.view.contains(id));
            inner.view.begin_create(temp_id.clone(), text);
            (temp_id, inner.view.pending_count())
        });
        tracing::debug!(%temp_id, pending, "create applied locally");

        match self.api.create(&NewTask::new(text)).await {
            Ok(task) => {
                tracing::debug!(%temp_id, id = %task.id, "create confirmed");
                self.shared.update(|inner| {
                    inner.view.confirm_create(&temp_id, task);
                    inner.stats.confirmed += 1;
                });
                Outcome::Confirmed
            }
            Err(e) => {
                self.shared.update(|inner| {
                    inner.view.rollback_create(&temp_id);
                    inner.stats.rolled_back += 1;
                });
                self.report_failure(&self.config.messages.create, &e);
                Outcome::RolledBack
            }
        }
    }

    /// Submits the current draft as a new task.
    pub async fn submit_draft(&self) -> Outcome {
        let draft = self.shared.read(|inner| inner.view.draft.clone());
        self.create(&draft).await
    }

    /// Flips a task's completion flag.
    ///
    /// `task` is the value the caller rendered; it is what a failure
    /// restores.
    pub async fn toggle_complete(&self, task: TaskView) -> Outcome {
        let toggled = self.shared.update(|inner| inner.view.begin_toggle(&task));
        tracing::debug!(id = %task.id, completed = toggled.completed, "toggle applied locally");

        match self.api.update(&toggled.to_task()).await {
            Ok(stored) => {
                self.shared.update(|inner| {
                    inner.view.confirm_toggle(stored);
                    inner.stats.confirmed += 1;
                });
                Outcome::Confirmed
            }
            Err(e) => {
                self.shared.update(|inner| {
                    inner.view.rollback_toggle(task);
                    inner.stats.rolled_back += 1;
                });
                self.report_failure(&self.config.messages.update, &e);
                Outcome::RolledBack
            }
        }
    }

    /// Removes a task.
    ///
    /// The request is sent even if the id is not shown. A failure puts the
    /// removed task back at the end of the list.
    pub async fn delete(&self, id: &TaskId) -> Outcome {
        let removed = self.shared.update(|inner| inner.view.begin_delete(id));
        tracing::debug!(%id, shown = removed.is_some(), "delete applied locally");

        match self.api.delete(id).await {
            Ok(()) => {
                self.shared.update(|inner| inner.stats.confirmed += 1);
                Outcome::Confirmed
            }
            Err(e) => {
                self.shared.update(|inner| {
                    if let Some(removed) = removed {
                        inner.view.rollback_delete(removed);
                    }
                    inner.stats.rolled_back += 1;
                });
                self.report_failure(&self.config.messages.delete, &e);
                Outcome::RolledBack
            }
        }
    }

    /// Shows `message` and schedules it to clear.
    ///
    /// Only the timer of the latest notice may clear it.
    fn report_failure(&self, message: &str, error: &SyncError) {
        tracing::warn!(error = %error, "{message}");
        let generation = self.shared.update(|inner| {
            inner.error_generation += 1;
            inner.view.error_message = Some(message.to_string());
            inner.error_generation
        });

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no runtime available, error notice will not clear");
            return;
        };
        let shared = Arc::clone(&self.shared);
        let delay = self.config.error_display;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.update(|inner| {
                if inner.error_generation == generation {
                    inner.view.error_message = None;
                }
            });
        });
    }
}

impl<A> std::fmt::Debug for SyncEngine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
