//! Serve command implementation.

use super::CliResult;
use std::net::SocketAddr;
use std::path::PathBuf;
use ticklist_server::{ServerConfig, TaskServer};

/// Runs the task server until interrupted.
pub async fn run(bind: SocketAddr, data: Option<PathBuf>, cors: bool) -> CliResult<()> {
    let mut config = ServerConfig::new(bind).with_cors(cors);
    if let Some(dir) = data {
        config = config.with_data_dir(dir);
    }

    let server = TaskServer::new(config)?;
    let listener = server.bind().await?;
    server
        .serve_on(listener, async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("shutdown requested"),
                Err(e) => {
                    tracing::warn!(error = %e, "cannot listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;
    Ok(())
}
