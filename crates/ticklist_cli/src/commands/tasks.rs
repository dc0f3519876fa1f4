//! Task commands, run through the sync engine against a server.

use super::{CliError, CliResult};
use ticklist_protocol::{Task, TaskId};
use ticklist_sync_engine::{EngineConfig, HttpTransport, Outcome, SyncEngine, TaskView};

type Engine = SyncEngine<HttpTransport>;

async fn connect(server: &str) -> CliResult<Engine> {
    let engine = SyncEngine::new(HttpTransport::new(server), EngineConfig::default());
    settle(&engine, engine.load_all().await)?;
    Ok(engine)
}

fn settle(engine: &Engine, outcome: Outcome) -> CliResult<()> {
    match outcome {
        Outcome::RolledBack => Err(CliError::Rejected(
            engine
                .error_message()
                .unwrap_or_else(|| "request failed".to_string()),
        )),
        Outcome::Confirmed | Outcome::Skipped => Ok(()),
    }
}

/// Renders one task as a single line.
pub fn render(task: &TaskView) -> String {
    let marker = if task.completed { "✓" } else { "·" };
    let pending = if task.pending { " …" } else { "" };
    format!("{marker} {}  {}{pending}", task.id, task.text)
}

/// Prints every task.
pub async fn list(server: &str, format: &str) -> CliResult<()> {
    let engine = connect(server).await?;
    let tasks = engine.tasks();
    match format {
        "text" => {
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in &tasks {
                println!("{}", render(task));
            }
        }
        "json" => {
            let wire: Vec<Task> = tasks.iter().map(TaskView::to_task).collect();
            println!("{}", serde_json::to_string_pretty(&wire)?);
        }
        other => return Err(CliError::UnknownFormat(other.to_string())),
    }
    Ok(())
}

/// Creates a task and prints it.
pub async fn add(server: &str, text: &str) -> CliResult<()> {
    let engine = connect(server).await?;
    match engine.create(text).await {
        Outcome::Skipped => Err(CliError::Rejected("task text is empty".to_string())),
        outcome => {
            settle(&engine, outcome)?;
            if let Some(task) = engine.tasks().last() {
                println!("{}", render(task));
            }
            Ok(())
        }
    }
}

/// Flips a task's completion flag and prints the result.
pub async fn toggle(server: &str, id: &str) -> CliResult<()> {
    let engine = connect(server).await?;
    let id = TaskId::new(id);
    let task = engine
        .snapshot()
        .get(&id)
        .cloned()
        .ok_or_else(|| CliError::UnknownTask(id.clone()))?;

    settle(&engine, engine.toggle_complete(task).await)?;
    if let Some(task) = engine.snapshot().get(&id) {
        println!("{}", render(task));
    }
    Ok(())
}

/// Deletes a task.
pub async fn remove(server: &str, id: &str) -> CliResult<()> {
    let engine = connect(server).await?;
    let id = TaskId::new(id);
    if !engine.snapshot().contains(&id) {
        return Err(CliError::UnknownTask(id));
    }

    settle(&engine, engine.delete(&id).await)?;
    println!("Deleted {id}");
    Ok(())
}
