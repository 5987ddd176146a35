//! CLI interface for quickopen.
//!
//! Provides command-line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::SearchStrategy;

/// Match strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Strategy {
    /// Prefix matching on whole tokens.
    Precise,
    /// Prefix matching tolerating typos.
    Fuzzy,
}

impl From<Strategy> for SearchStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Precise => SearchStrategy::Precise,
            Strategy::Fuzzy => SearchStrategy::Fuzzy,
        }
    }
}

/// Command-line interface for quickopen.
#[derive(Parser)]
#[command(name = "quickopen")]
#[command(author, version, about = "Search browser tabs, bookmarks and history", long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search tabs, bookmarks, history and search engines.
    ///
    /// Prefix the query with "h ", "b ", "t " or "s " to search only history,
    /// bookmarks, tabs or search engines. Use "#" for tags and "~" for folders.
    Search {
        /// The raw query, including an optional mode prefix.
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Browser snapshot to search instead of the configured one.
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Match strategy, overriding the configured one.
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show how many records each browser source provides.
    Sources {
        /// Browser snapshot to read instead of the configured one.
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Start the MCP server for AI editor integration.
    #[cfg(feature = "mcp")]
    Serve,
}
