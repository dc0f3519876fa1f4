//! Main task server.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{router, AppState};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use ticklist_store::{FileStore, InMemoryStore, TaskStore};
use tokio::net::TcpListener;

/// The task server.
///
/// Owns the store chosen by [`ServerConfig::data_dir`] and serves the task
/// routes over it.
///
/// # Example
///
/// ```
/// use ticklist_server::{ServerConfig, TaskServer};
///
/// let server = TaskServer::new(ServerConfig::default()).unwrap();
/// let app = server.router();
/// # drop(app);
/// ```
pub struct TaskServer {
    config: ServerConfig,
    store: Arc<dyn TaskStore>,
}

impl TaskServer {
    /// Creates a server, opening the durable store if a data directory is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store: Arc<dyn TaskStore> = match &config.data_dir {
            Some(dir) => {
                tracing::info!(path = %dir.display(), "opening task store");
                Arc::new(FileStore::open(dir, config.store.clone())?)
            }
            None => {
                tracing::info!("using in-memory task store");
                Arc::new(InMemoryStore::new())
            }
        };
        Ok(Self { config, store })
    }

    /// Creates a server over an existing store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn TaskStore>) -> Self {
        Self { config, store }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Builds the router.
    pub fn router(&self) -> Router {
        router(AppState::new(Arc::clone(&self.store)), &self.config)
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        Ok(TcpListener::bind(self.config.bind_addr).await?)
    }

    /// Binds the configured address and serves until the process ends.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = self.bind().await?;
        self.serve_on(listener, std::future::pending()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!(%addr, "server running on http://{}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerError;
    use tempfile::tempdir;
    use ticklist_protocol::NewTask;
    use ticklist_store::StoreError;

    #[test]
    fn in_memory_by_default() {
        let server = TaskServer::new(ServerConfig::default()).unwrap();
        assert!(server.store().is_empty().unwrap());
    }

    #[test]
    fn data_dir_persists_across_servers() {
        let dir = tempdir().unwrap();
        let config = ServerConfig::default().with_data_dir(dir.path());

        {
            let server = TaskServer::new(config.clone()).unwrap();
            server.store().insert(NewTask::new("durable")).unwrap();
        }

        let server = TaskServer::new(config).unwrap();
        let tasks = server.store().list().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "durable");
    }

    #[test]
    fn locked_data_dir_fails() {
        let dir = tempdir().unwrap();
        let config = ServerConfig::default().with_data_dir(dir.path());
        let _first = TaskServer::new(config.clone()).unwrap();

        let second = TaskServer::new(config);
        assert!(matches!(
            second,
            Err(ServerError::Store(StoreError::Locked))
        ));
    }

    #[tokio::test]
    async fn serve_until_shutdown() {
        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap());
        let server = TaskServer::new(config).unwrap();
        let listener = server.bind().await.unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_on(listener, async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
