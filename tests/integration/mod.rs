//! Integration tests for the simvfs virtual file system

mod cli_contracts;
mod persistence;
mod support;
mod tree_properties;
mod vfs_scenarios;
