use clap::{Parser, Subcommand};
use queue_core::config::ConfigOverrides;
use queue_core::task_api::PRIORITY_RANGE;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "todo",
    author,
    version,
    about = "A simple todo list manager with a queue system",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task to the queue
    ///
    /// Example: todo add Fix the printer -r dana -p 1 -d 45
    Add {
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
        /// Person who requested this task
        #[arg(short, long)]
        requester: Option<String>,
        /// Priority (1-5, where 1 is highest)
        #[arg(short, long, allow_hyphen_values = true)]
        priority: Option<String>,
        /// Estimated duration in minutes
        #[arg(short, long, allow_hyphen_values = true)]
        duration: Option<String>,
    },
    /// List all tasks
    ///
    /// Example: todo list --status pending
    List {
        /// Filter by status (pending/in_progress/completed/all)
        #[arg(short, long, default_value = "")]
        status: String,
    },
    /// Mark a task as completed
    ///
    /// Example: todo complete 3
    Complete { id: String },
    /// Mark a task as in progress
    ///
    /// Example: todo start 3
    Start { id: String },
    /// Update the estimated duration for a task (in minutes)
    ///
    /// Example: todo estimate 3 90
    Estimate {
        id: String,
        #[arg(allow_hyphen_values = true)]
        duration: String,
    },
    /// Remove a task from the list
    ///
    /// Example: todo remove 3
    #[command(visible_aliases = ["cancel", "delete"])]
    Remove { id: String },
    /// Show current queue information
    ///
    /// Example: todo queue
    Queue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    StorePath,
    DefaultPriority,
    DefaultDuration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        "default_priority" | "priority" => ConfigOverrideTarget::DefaultPriority,
        "default_duration" | "duration" => ConfigOverrideTarget::DefaultDuration,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` into one set; later flags win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::StorePath => {
                if parsed.value.is_empty() {
                    return Err("store_path override cannot be empty".to_string());
                }
                overrides.store_path = Some(PathBuf::from(parsed.value));
            }
            ConfigOverrideTarget::DefaultPriority => {
                let priority = parsed
                    .value
                    .parse::<u8>()
                    .ok()
                    .filter(|priority| PRIORITY_RANGE.contains(priority))
                    .ok_or_else(|| "default_priority must be between 1 and 5".to_string())?;
                overrides.default_priority = Some(priority);
            }
            ConfigOverrideTarget::DefaultDuration => {
                let duration = parsed
                    .value
                    .parse::<u32>()
                    .ok()
                    .filter(|minutes| *minutes > 0)
                    .ok_or_else(|| "default_duration must be a positive number".to_string())?;
                overrides.default_duration = Some(duration);
            }
        }
    }

    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
