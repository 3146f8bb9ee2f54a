use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "prio", about = "Local task list with server-assisted prioritization")]
pub struct Cli {
    /// Path to the local database [default: ~/.prio/prio.db]
    #[arg(long, env = "PRIO_DB", global = true)]
    pub db: Option<String>,

    /// Base URL of the analysis API
    #[arg(
        long,
        env = "PRIO_API",
        global = true,
        default_value = "http://localhost:8000"
    )]
    pub api: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database (idempotent)
    Init,

    /// Add a task to the end of the list
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD, today or later)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Estimated hours of work
        #[arg(long, default_value_t = 1)]
        hours: u32,
        /// Importance on a 1-10 scale
        #[arg(long, default_value_t = 5)]
        importance: u8,
        /// Dependency task ids, comma separated
        #[arg(long, value_delimiter = ',')]
        deps: Vec<u64>,
    },

    /// Mark the task at INDEX complete, removing it from the list
    #[command(alias = "rm")]
    Done {
        /// 1-based position in the list
        index: usize,
    },

    /// List tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the whole list from a JSON document
    Import {
        /// File to read (omit to read from stdin)
        file: Option<String>,
    },

    /// Score the task list via the analysis endpoint
    Analyze {
        /// Server-side prioritization strategy
        #[arg(long, default_value = "default")]
        strategy: String,
        /// Output the raw report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the server for prioritization suggestions
    Suggest {
        /// Server-side prioritization strategy
        #[arg(long, default_value = "default")]
        strategy: String,
        /// Output the raw report as JSON
        #[arg(long)]
        json: bool,
    },
}
