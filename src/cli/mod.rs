//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Task commands live in `task`, setup in `init`.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{default_config_path, Config};
use crate::error::Result;
use crate::view::Filter;

mod init;
mod task;

/// todo - a local to-do list manager
///
/// Create, edit, complete, delete, and filter tasks. Tasks persist as JSON
/// in a local data directory.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the task collection
    #[arg(long, global = true, env = "TODO_DIR")]
    pub dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, global = true, env = "TODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and a default config file
    Init,

    /// Add a new task
    Add {
        /// Task name (at most 100 characters)
        name: String,

        /// Task description (at most 500 characters)
        description: String,
    },

    /// Edit a task's name and/or description
    Edit {
        /// Task id or unique id prefix
        id: String,

        /// New name (keeps the current one if omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// New description (keeps the current one if omitted)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Mark a task complete, or active again
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// Delete a task permanently (asks first unless --force)
    Rm {
        /// Task id or unique id prefix
        id: String,

        /// Delete without asking for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// List tasks, incomplete first and newest first
    List {
        /// Which tasks to show (defaults to view.default_filter)
        #[arg(short, long, value_enum)]
        filter: Option<Filter>,
    },

    /// Print how many tasks match a filter
    Count {
        /// Which tasks to count
        #[arg(short, long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },
}

/// Resolved settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub json: bool,
    pub quiet: bool,
}

impl Context {
    fn resolve(dir: Option<&Path>, config: Option<PathBuf>, json: bool, quiet: bool) -> Self {
        let config_path = config.or_else(default_config_path);
        let loaded = Config::load_or_default(config_path.as_deref());
        let data_dir = loaded.data_dir(dir);
        Self {
            config: loaded,
            config_path,
            data_dir,
            json,
            quiet,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = Context::resolve(self.dir.as_deref(), self.config, self.json, self.quiet);
        tracing::debug!(data_dir = %ctx.data_dir.display(), "resolved data directory");

        match self.command {
            Commands::Init => init::run(&ctx),
            Commands::Add { name, description } => {
                task::run_add(&ctx, task::AddOptions { name, description })
            }
            Commands::Edit {
                id,
                name,
                description,
            } => task::run_edit(
                &ctx,
                task::EditOptions {
                    id,
                    name,
                    description,
                },
            ),
            Commands::Toggle { id } => task::run_toggle(&ctx, task::ToggleOptions { id }),
            Commands::Rm { id, force } => task::run_rm(&ctx, task::RmOptions { id, force }),
            Commands::List { filter } => task::run_list(&ctx, task::ListOptions { filter }),
            Commands::Count { filter } => task::run_count(&ctx, task::CountOptions { filter }),
        }
    }
}
