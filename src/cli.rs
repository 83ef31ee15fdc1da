//! CLI argument parsing for tasklink.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklink::{Status, TaskId};

#[derive(Parser)]
#[command(
    name = "tl",
    about = "Personal task tracking with linked tasks",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/tasklink/logs/tasklink.log"
)]
pub struct Cli {
    /// Task file (default: store_path from the config file, else ./.tasks.json)
    #[arg(short = 'f', long, global = true, env = "TASKLINK_FILE")]
    pub file: Option<PathBuf>,

    /// Config file (default: ~/.config/tasklink/config.yaml)
    #[arg(long, global = true, env = "TASKLINK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Description
        #[arg(short = 'd', long, default_value = "")]
        description: String,

        /// Initial status (open, in-progress, done, blocked)
        #[arg(short, long, default_value = "open")]
        status: Status,

        /// Tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List all tasks
    List,

    /// Show a single task
    Show {
        /// Task ID
        id: TaskId,
    },

    /// Edit a task; only the given fields change
    Edit {
        /// Task ID
        id: TaskId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short = 'd', long)]
        description: Option<String>,

        /// New status (open, in-progress, done, blocked)
        #[arg(short, long)]
        status: Option<Status>,

        /// Replace tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Delete a task and its links
    Delete {
        /// Task ID
        id: TaskId,
    },

    /// Link two tasks
    Link {
        /// First task ID
        a: TaskId,

        /// Second task ID
        b: TaskId,
    },

    /// Remove the link between two tasks
    Unlink {
        /// First task ID
        a: TaskId,

        /// Second task ID
        b: TaskId,
    },

    /// Search tasks
    Search {
        /// Words that must all appear in title or description
        text: Vec<String>,

        /// Tag filter
        #[arg(short, long)]
        tag: Option<String>,

        /// Status filter (open, in-progress, done, blocked)
        #[arg(short, long)]
        status: Option<Status>,
    },

    /// Show task counts per status
    Summary {
        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a prose digest of all tasks
    Digest,
}
