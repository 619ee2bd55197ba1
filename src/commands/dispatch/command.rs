//! Command trait and context for dispatching commands

use std::time::Instant;

use crate::cli::Cli;
use vaultdb_core::db::Database;
use vaultdb_core::error::Result;
use vaultdb_core::format::OutputFormat;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    /// Open (creating if needed) the database named by `--db`
    pub fn open_database(&self) -> Result<Database> {
        let db = Database::open(&self.cli.db)?;
        tracing::debug!(elapsed = ?self.start.elapsed(), db = %self.cli.db.display(), "open_database");
        Ok(db)
    }

    pub fn is_json(&self) -> bool {
        self.cli.format == OutputFormat::Json
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("vaultdb {}", env!("CARGO_PKG_VERSION"));
        println!("Run `vaultdb --help` for usage.");
        Ok(())
    }
}
