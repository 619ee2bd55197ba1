//! Command dispatch logic for vaultdb

use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands::{files, index, links, parse, stats, tags};
use vaultdb_core::error::Result;

mod command;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let ctx = CommandContext::new(cli, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Index { root, chunk_size } => index::execute(ctx, root, *chunk_size),
            Commands::Parse { file, root } => parse::execute(ctx, file, root.as_deref()),
            Commands::Files(args) => files::execute_list(ctx, &args.to_filter()),
            Commands::File(args) => files::execute_find(ctx, &args.to_filter()),
            Commands::Tags { file_ids } => tags::execute(ctx, file_ids),
            Commands::Links { forward, backward } => links::execute(ctx, *forward, *backward),
            Commands::Stats => stats::execute(ctx),
        }
    }
}
