use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rFinishline
/// CLI application to record finish times and build race standings with SQLite
#[derive(Parser)]
#[command(
    name = "rfinishline",
    version = env!("CARGO_PKG_VERSION"),
    about = "A race-timing CLI: record finish times, rank athletes and compute gaps using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage events (races)
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Record and manage finish times
    Time {
        #[command(subcommand)]
        action: TimeAction,
    },

    /// Manage the bib list (bib → athlete, category)
    Bib {
        #[command(subcommand)]
        action: BibAction,
    },

    /// Show statistics of an event
    Stats {
        /// Event id
        event: i64,

        #[arg(long, help = "Print statistics as JSON")]
        json: bool,
    },

    /// Export the standings of an event
    Export {
        #[arg(long, short = 'e', value_name = "EVENT_ID")]
        event: i64,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute path of the output file")]
        file: String,

        #[arg(long, help = "Only export athletes of this category")]
        category: Option<String>,

        #[arg(long, short = 'f', help = "Overwrite the output file without asking")]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite the backup file without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Create an event (the oldest is removed beyond `max_events`)
    Add {
        name: String,

        #[arg(long, help = "Start instant (RFC 3339, 'YYYY-MM-DD HH:MM[:SS]' or 'HH:MM[:SS]')")]
        start: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// List events, newest first
    List,

    /// Show one event with participants and times
    Show { id: i64 },

    /// Change name, start, note or status of an event
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, conflicts_with = "clear_start")]
        start: Option<String>,

        #[arg(long = "clear-start", help = "Remove the start instant")]
        clear_start: bool,

        #[arg(long, help = "New note (empty string clears it)")]
        note: Option<String>,

        #[arg(long, help = "active | closed")]
        status: Option<String>,
    },

    /// Delete an event with its times and bib list
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Delete all times of an event, keeping the event
    Reset {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TimeAction {
    /// Record a finish time
    Add {
        /// Event id
        event: i64,

        #[arg(
            long,
            help = "Elapsed time (ms, MM:SS[.fff] or H:MM:SS[.fff]); derived from the event start when omitted"
        )]
        elapsed: Option<String>,

        #[arg(long = "at", help = "Arrival instant (default: now)")]
        at: Option<String>,

        #[arg(long)]
        bib: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Record many finish times from a CSV file (bib, elapsed, arrival, note)
    Bulk {
        /// Event id
        event: i64,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Change bib or note of a time (empty string clears)
    Edit {
        id: i64,

        #[arg(long)]
        bib: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Delete a time and re-rank the event
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List the times of an event
    List {
        /// Event id
        event: i64,

        #[arg(long, short = 's', help = "Case-insensitive match on bib or note")]
        search: Option<String>,

        #[arg(long = "order-by", default_value = "elapsed", help = "rank | bib | elapsed (elapsedMs) | created (createdAt)")]
        order_by: String,

        #[arg(long = "order-dir", default_value = "ASC", help = "ASC | DESC")]
        order_dir: String,
    },

    /// Standings with athlete names and categories
    Standings {
        /// Event id
        event: i64,

        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BibAction {
    /// Replace the bib list from a CSV file
    Import {
        /// Event id
        event: i64,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Replace the bib list with `BIB[:NAME[:CATEGORY]]` entries
    Set {
        /// Event id
        event: i64,

        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Show the bib list of an event
    List {
        /// Event id
        event: i64,
    },

    /// Delete the bib list of an event
    Clear {
        /// Event id
        event: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
