//! `taskdeck`: local-first task manager.
//!
//! Each invocation is one session: the stored task state is hydrated (or
//! the mock backend is fetched), the requested operation runs, and the
//! resulting state is written back. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # List tasks (seeds from the mock backend on first run)
//! cargo run --bin taskdeck
//!
//! # Create, toggle, delete
//! cargo run --bin taskdeck -- add --title "Write docs" --description "README"
//! cargo run --bin taskdeck -- toggle 1
//! cargo run --bin taskdeck -- delete 2
//! ```

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::app::{SubmitError, TaskManagerApp};
use taskdeck::config::{AppConfig, CliArgs, Command};
use taskdeck::form::TaskForm;
use taskdeck::persist::PersistenceBridge;
use taskdeck::storage::FileStorage;
use taskdeck::tasks::{TaskError, TaskStore};
use taskdeck::view;
use taskdeck_proto::state::TasksState;
use taskdeck_proto::task::TaskId;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to a file so stdout carries only command output.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let storage_dir = match config.storage_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(dir = %storage_dir.display(), "taskdeck starting");

    let store = TaskStore::with_state(
        config.mock_api(),
        TasksState::with_expires_in(config.cache_expires_in_ms()),
    );
    let bridge = PersistenceBridge::with_key(FileStorage::new(storage_dir), &config.storage_key);
    let mut app = TaskManagerApp::new(store, bridge);

    if let Err(e) = app.start().await {
        tracing::warn!(error = %e, "initial load failed");
    }

    let command = cli.command.clone().unwrap_or(Command::List);
    let outcome = run_command(&mut app, &command).await;

    for notification in app.drain_notifications() {
        println!("{}", view::notification_line(&notification));
    }
    if let Some(banner) = app.error_banner() {
        println!("Error: {banner}");
    }

    match outcome {
        Ok(()) => {
            if command != Command::Show {
                println!("{}", view::task_list(&app.tasks(), &config.timestamp_format));
            }
            tracing::info!("taskdeck exiting");
            ExitCode::SUCCESS
        }
        Err(SubmitError::Invalid(errors)) => {
            if let Some(msg) = errors.title {
                eprintln!("title: {msg}");
            }
            if let Some(msg) = errors.description {
                eprintln!("description: {msg}");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::warn!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Runs one subcommand against the session.
async fn run_command<A, S>(
    app: &mut TaskManagerApp<A, S>,
    command: &Command,
) -> Result<(), SubmitError>
where
    A: taskdeck::api::TaskApi,
    S: taskdeck::storage::Storage + 'static,
{
    match command {
        Command::List => {}
        Command::Add { title, description } => {
            app.add(TaskForm::new(title.as_str(), description.as_str()))
                .await?;
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            let id = TaskId::from(id.as_str());
            let Some(mut form) = app.begin_edit(&id) else {
                return Err(TaskError::NotFound(id).into());
            };
            if let Some(title) = title {
                form.title.clone_from(title);
            }
            if let Some(description) = description {
                form.description.clone_from(description);
            }
            app.submit_edit(&id, form).await?;
        }
        Command::Delete { id } => {
            app.delete(&TaskId::from(id.as_str())).await?;
        }
        Command::Toggle { id } => {
            app.toggle_complete(&TaskId::from(id.as_str())).await?;
        }
        Command::Refresh => {
            // Failures show up through the error banner.
            let _ = app.refresh().await;
        }
        Command::Show => match app.bridge().load() {
            Some(record) => match serde_json::to_string_pretty(&record) {
                Ok(text) => println!("{text}"),
                Err(e) => tracing::warn!(error = %e, "could not render stored state"),
            },
            None => println!("(no stored state)"),
        },
    }
    Ok(())
}
