//! QuoteSync CLI
//!
//! Command-line interface for the QuoteSync quote collection.
//!
//! # Commands
//!
//! - `show` - Print a random quote
//! - `list` - List the collection
//! - `categories` - List categories
//! - `add` - Add a quote and sync
//! - `import` / `export` - JSON payload exchange
//! - `sync` - Run a single sync cycle
//! - `watch` - Sync on an interval until interrupted

mod commands;
mod session;

use clap::{Parser, Subcommand};
use quotesync_engine::SyncConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// QuoteSync command-line quote collection tools.
#[derive(Parser)]
#[command(name = "quotesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the quote collection file
    #[arg(global = true, short, long, default_value = "quotes.json")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a random quote
    Show {
        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List the quote collection
    List {
        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List every category with its quote count
    Categories,

    /// Add a quote and sync it to the remote
    Add {
        /// Quote text
        text: String,

        /// Quote category
        category: String,
    },

    /// Import quotes from a JSON file
    Import {
        /// File to read
        file: PathBuf,
    },

    /// Export the collection as JSON
    Export {
        /// File to write; prints to stdout when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Run a single sync cycle against the remote
    Sync,

    /// Sync on an interval until interrupted
    Watch {
        /// Seconds between sync cycles
        #[arg(short, long, default_value = "30")]
        interval: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = SyncConfig::new();
    if let Commands::Watch { interval } = &cli.command {
        config = config.with_sync_interval(Duration::from_secs(*interval));
    }
    let controller = session::open(&cli.path, config)?;

    match cli.command {
        Commands::Show { category } => {
            commands::show::run(&controller, category.as_deref());
        }
        Commands::List { category, format } => {
            commands::list::run(&controller, category.as_deref(), &format)?;
        }
        Commands::Categories => {
            commands::categories::run(&controller);
        }
        Commands::Add { text, category } => {
            commands::add::run(&controller, &text, &category)?;
        }
        Commands::Import { file } => {
            commands::import::run(&controller, &file)?;
        }
        Commands::Export { file } => {
            commands::export::run(&controller, file.as_deref())?;
        }
        Commands::Sync => {
            commands::sync::run(&controller)?;
        }
        Commands::Watch { .. } => {
            commands::watch::run(&controller);
        }
    }

    Ok(())
}
