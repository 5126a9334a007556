//! Tooling
//!
//! Command-line front end over the VFS service.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ConsoleNotifier};
