mod cli;
mod output;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::{Cli, Command, collect_config_overrides};
use queue_core::config::{AddDefaults, load_config_with_fallback, merge_overrides};
use queue_core::error::AppError;
use queue_core::storage::json_store;
use queue_core::store::TaskStore;
use queue_core::task_api::{self, AddRequest, StatusFilter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV_VAR: &str = "TODO_DEBUG";

fn init_tracing() {
    if std::env::var(DEBUG_ENV_VAR).is_ok() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("queue_core=debug,todo=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(
    command: Command,
    store: &mut TaskStore,
    json: bool,
    add_defaults: AddDefaults,
) -> Result<(), AppError> {
    match command {
        Command::Add {
            description,
            requester,
            priority,
            duration,
        } => {
            let description = description.join(" ");
            let request = AddRequest {
                description: &description,
                requester: requester.as_deref(),
                priority: priority.as_deref(),
                duration: duration.as_deref(),
            };
            let added = task_api::add_task(store, request, add_defaults)?;
            if json {
                output::print_added_json(&added)?;
            } else {
                output::print_added(&added);
            }
        }
        Command::List { status } => {
            let filter = StatusFilter::from_label(&status);
            let tasks = task_api::list_tasks(store.list(), filter);
            if json {
                output::print_tasks_json(&tasks)?;
            } else {
                output::print_tasks_plain(&tasks)?;
            }
        }
        Command::Complete { id } => {
            let id = task_api::parse_task_id(&id)?;
            let task = task_api::complete_task(store, id)?;
            if json {
                output::print_task_json(&task)?;
            } else {
                println!("Marked task #{} as completed", task.id);
            }
        }
        Command::Start { id } => {
            let id = task_api::parse_task_id(&id)?;
            let task = task_api::start_task(store, id)?;
            if json {
                output::print_task_json(&task)?;
            } else {
                println!("Started working on task #{}", task.id);
            }
        }
        Command::Estimate { id, duration } => {
            let id = task_api::parse_task_id(&id)?;
            let minutes = task_api::parse_estimate(&duration)?;
            let task = task_api::estimate_task(store, id, minutes)?;
            if json {
                output::print_task_json(&task)?;
            } else {
                println!(
                    "Updated estimated duration for task #{} to {} minutes",
                    task.id, task.estimated_duration
                );
            }
        }
        Command::Remove { id } => {
            let id = task_api::parse_task_id(&id)?;
            let task = task_api::remove_task(store, id)?;
            if json {
                output::print_task_json(&task)?;
            } else {
                println!("Removed task #{}: {}", task.id, task.description);
                println!("Queue positions have been updated");
            }
        }
        Command::Queue => {
            let summary = task_api::queue_summary(store.list());
            if json {
                output::print_queue_json(&summary);
            } else {
                output::print_queue_plain(&summary);
            }
        }
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let Some(command) = cli.command else {
        print_help();
        return Ok(());
    };

    let overrides =
        collect_config_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: using default config: {err}");
    }
    let config = merge_overrides(&loaded.config, &overrides);

    let path = json_store::store_path(config.store_path.as_deref())?;
    let mut store = TaskStore::open(path)?;
    debug!(
        path = %store.path().display(),
        tasks = store.list().tasks.len(),
        "opened task store"
    );

    run_command(command, &mut store, cli.json, config.add_defaults())
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
