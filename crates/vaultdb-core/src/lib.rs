//! vaultdb core library
//!
//! Indexes a vault of markdown notes into a SQLite link graph: discovery,
//! parsing, link extraction, graph assembly, persistence and queries.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod format;
pub mod graph;
pub mod logging;
pub mod markdown;
pub mod metadata;
pub mod parser;
pub mod paths;
pub mod records;
pub mod vault;
