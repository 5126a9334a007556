//! simvfs CLI Binary

use anyhow::Context;
use clap::Parser;
use simvfs::config::ConfigLoader;
use simvfs::logging::init_logging;
use simvfs::notify::NullNotifier;
use simvfs::tooling::cli::{Cli, CliContext, ConsoleNotifier};
use std::process;

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Warning: logging not initialized: {}", e);
    }

    let context = if cli.quiet {
        CliContext::new(&config, NullNotifier)
    } else {
        CliContext::new(&config, ConsoleNotifier)
    }
    .context("Failed to open virtual file system")?;

    Ok(context.execute(&cli.command)?)
}
