//! Ticklist CLI
//!
//! Runs the task server and talks to it from the terminal.
//!
//! # Commands
//!
//! - `serve` - Run the task API
//! - `list` - Show every task
//! - `add` - Create a task
//! - `toggle` - Flip a task's completion flag
//! - `rm` - Delete a task

mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ticklist task server and client.
#[derive(Parser)]
#[command(name = "ticklist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the task server
    #[arg(global = true, short, long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the task API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// Directory for durable storage (in-memory if omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Disable permissive CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Show every task
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Create a task
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Flip a task's completion flag
    Toggle {
        /// Task id
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            bind,
            data,
            no_cors,
        } => {
            commands::serve::run(bind, data, !no_cors).await?;
        }
        Commands::List { format } => {
            commands::tasks::list(&cli.server, &format).await?;
        }
        Commands::Add { text } => {
            commands::tasks::add(&cli.server, &text.join(" ")).await?;
        }
        Commands::Toggle { id } => {
            commands::tasks::toggle(&cli.server, &id).await?;
        }
        Commands::Rm { id } => {
            commands::tasks::remove(&cli.server, &id).await?;
        }
        Commands::Version => {
            println!("Ticklist CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
