use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use taskboard_core::config::{ConfigOverrides, canonicalize_key};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current, other and completed lists
    ///
    /// Example: taskboard list
    List,
    /// Print the three lists as HTML fragments
    ///
    /// Example: taskboard page
    Page,
    /// Add a new task
    ///
    /// Example: taskboard add "Buy milk" 2024-06-20 --category Personal
    Add {
        name: Option<String>,
        due: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Mark a task completed, or reopen a completed one
    ///
    /// Example: taskboard toggle 0
    Toggle { index: usize },
    /// Move a task to the current list
    ///
    /// Example: taskboard select 2
    Select { index: usize },
    /// Move a task back to the other list
    ///
    /// Example: taskboard unselect 2
    Unselect { index: usize },
    /// Open a task's edit form
    ///
    /// Example: taskboard edit 1
    Edit { index: usize },
    /// Close the edit form without saving
    Cancel,
    /// Save a task's name, due date and category
    ///
    /// Example: taskboard save 1 "Buy oat milk" 2024-06-21 Personal
    Save {
        index: usize,
        name: String,
        due: String,
        category: String,
    },
    /// Remove a task
    ///
    /// Example: taskboard remove 3
    Remove { index: usize },
    /// Drag a task onto another row of the same list
    ///
    /// Example: taskboard move 4 0
    Move { from: usize, to: usize },
    /// Show or edit the notes page
    Notes {
        #[command(subcommand)]
        notes: NotesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// Render the notes as HTML
    Show,
    /// Start editing and print the raw text
    Edit,
    /// Replace the raw text while editing
    ///
    /// Example: taskboard notes input "# Today"
    Input { text: String },
    /// Finish editing and render the notes
    Done,
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Categories,
    BackendUrl,
    DataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonicalize_key(key_raw);
    if field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "categories" | "category" => ConfigOverrideTarget::Categories,
        "backend_url" | "backend" | "url" => ConfigOverrideTarget::BackendUrl,
        "data_dir" | "data" => ConfigOverrideTarget::DataDir,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Categories => {
                overrides.categories = Some(
                    parsed
                        .value
                        .split(',')
                        .map(|category| category.trim().to_string())
                        .filter(|category| !category.is_empty())
                        .collect(),
                )
            }
            ConfigOverrideTarget::BackendUrl => overrides.backend_url = Some(parsed.value),
            ConfigOverrideTarget::DataDir => overrides.data_dir = Some(PathBuf::from(parsed.value)),
        }
    }
    Ok(overrides)
}
