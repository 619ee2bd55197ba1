//! Command implementations for vaultdb

pub mod dispatch;
pub mod files;
pub mod index;
pub mod links;
pub mod parse;
pub mod stats;
pub mod tags;

use serde::Serialize;

use vaultdb_core::error::Result;

/// Print `value` as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
