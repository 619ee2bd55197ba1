//! CLI argument parsing for vaultdb
//!
//! Global flags: --db, --config, --format, --quiet, --verbose and the
//! logging switches.

pub mod args;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vaultdb_core::format::OutputFormat;

pub use args::FilterArgs;
use parse::parse_output_format;

/// Default SQLite database path, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "vaultdb.sqlite";

/// vaultdb - index a vault of markdown notes into a queryable link graph
#[derive(Parser, Debug)]
#[command(name = "vaultdb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "VAULTDB_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Explicit index configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human or json)
    #[arg(long, global = true, default_value = "human", value_parser = parse_output_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace) or a full filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a vault directory, replacing the database contents
    Index {
        /// Vault root directory
        root: PathBuf,

        /// Rows per batched insert (overrides the configuration)
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Parse one file and print its record and raw links without storing them
    Parse {
        /// File to parse
        file: PathBuf,

        /// Vault root the file belongs to (defaults to the file's directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// List indexed files matching the given conditions
    Files(FilterArgs),

    /// Show the first indexed file matching the given conditions
    File(FilterArgs),

    /// List tags, or the tags of specific files
    Tags {
        /// Only tags attached to this file id (repeatable)
        #[arg(long = "file-id", action = clap::ArgAction::Append)]
        file_ids: Vec<i64>,
    },

    /// List links, optionally from or to one file
    Links {
        /// Links whose source is this file id
        #[arg(long, conflicts_with = "backward")]
        forward: Option<i64>,

        /// Links whose target is this file id
        #[arg(long)]
        backward: Option<i64>,
    },

    /// Show row counts and index metadata
    Stats,
}
