//! End-to-end tests: the engine over HTTP against a live task server.

use std::sync::Arc;
use ticklist_protocol::{NewTask, Task, TaskId};
use ticklist_server::{ServerConfig, TaskServer};
use ticklist_store::{InMemoryStore, TaskStore};
use ticklist_sync_engine::{EngineConfig, HttpTransport, Outcome, SyncEngine, TaskView};
use tokio::sync::oneshot;

struct Harness {
    base_url: String,
    store: Arc<dyn TaskStore>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Harness {
    async fn start() -> Self {
        Self::start_with(Arc::new(InMemoryStore::new())).await
    }

    async fn start_with(store: Arc<dyn TaskStore>) -> Self {
        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap());
        let server = TaskServer::with_store(config, Arc::clone(&store));
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel();
        tokio::spawn(server.serve_on(listener, async {
            let _ = rx.await;
        }));

        Self {
            base_url: format!("http://{addr}"),
            store,
            shutdown: Some(tx),
        }
    }

    fn engine(&self) -> SyncEngine<HttpTransport> {
        SyncEngine::new(HttpTransport::new(&self.base_url), EngineConfig::default())
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn shown(engine: &SyncEngine<HttpTransport>) -> Vec<Task> {
    engine.tasks().iter().map(TaskView::to_task).collect()
}

#[tokio::test]
async fn full_lifecycle_matches_server() {
    let harness = Harness::start().await;
    let engine = harness.engine();

    assert_eq!(engine.load_all().await, Outcome::Confirmed);
    assert!(engine.tasks().is_empty());

    assert_eq!(engine.create("buy milk").await, Outcome::Confirmed);
    assert_eq!(engine.create("walk dog").await, Outcome::Confirmed);
    let milk = engine.tasks()[0].clone();
    assert!(!milk.id.is_temporary());

    assert_eq!(engine.toggle_complete(milk.clone()).await, Outcome::Confirmed);
    let dog = engine.tasks()[1].id.clone();
    assert_eq!(engine.delete(&dog).await, Outcome::Confirmed);

    assert_eq!(shown(&engine), harness.store.list().unwrap());
    assert!(engine.tasks()[0].completed);

    let fresh = harness.engine();
    fresh.load_all().await;
    assert_eq!(fresh.tasks(), engine.tasks());
    assert!(engine.error_message().is_none());
}

#[tokio::test]
async fn load_all_takes_server_order() {
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryStore::with_tasks(vec![
        Task::new(TaskId::new("b"), "second").with_completed(true),
        Task::new(TaskId::new("a"), "first"),
    ]));
    let harness = Harness::start_with(store).await;
    let engine = harness.engine();

    engine.load_all().await;
    let ids: Vec<String> = engine.tasks().iter().map(|t| t.id.to_string()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn delete_rejected_by_server_is_restored() {
    let harness = Harness::start().await;
    let task = harness.store.insert(NewTask::new("gone elsewhere")).unwrap();
    let engine = harness.engine();
    engine.load_all().await;

    harness.store.remove(&task.id).unwrap();

    assert_eq!(engine.delete(&task.id).await, Outcome::RolledBack);
    assert_eq!(shown(&engine), vec![task]);
    assert_eq!(engine.error_message().as_deref(), Some("Failed to delete task."));
}

#[tokio::test]
async fn unreachable_server_rolls_back_everything() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let engine = SyncEngine::new(
        HttpTransport::new(format!("http://{addr}")),
        EngineConfig::default(),
    );

    assert_eq!(engine.load_all().await, Outcome::RolledBack);
    assert!(!engine.is_loading_initial());
    assert_eq!(engine.error_message().as_deref(), Some("Failed to load tasks."));

    assert_eq!(engine.create("offline").await, Outcome::RolledBack);
    assert!(engine.tasks().is_empty());
    assert!(!engine.is_submitting());
    assert_eq!(engine.error_message().as_deref(), Some("Could not add task."));
    assert_eq!(engine.stats().rolled_back, 1);
}
