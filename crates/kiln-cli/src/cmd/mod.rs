//! Subcommand implementations

pub mod clean;
pub mod create;
pub mod info;
pub mod list;
