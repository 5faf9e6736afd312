//! The `dr` command-line entry point.

use clap::Parser;
use colored::*;
use dr_runner::{
    cli::{Cli, dispatcher},
    constants::TIMEOUT_EXIT_CODE,
    core::config_loader,
    system::executor::{ExecutionError, SystemSpawner},
    t,
};
use std::time::Duration;

/// The main entry point of `dr`.
/// It sets up logging, loads the configuration once, dispatches the invocation
/// and turns the outcome into the process exit code.
fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);

    // A configuration that cannot be loaded is fatal before any resolution happens.
    let config = match config_loader::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n{}: {}\n", t!("error.label").red().bold(), e);
            std::process::exit(1);
        }
    };

    let spawner = SystemSpawner::with_timeout(cli.timeout.map(Duration::from_secs));

    let (script, args) = cli.script_and_args();
    match dispatcher::dispatch(&config, script, args, &spawner) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let timed_out = e.chain().any(|cause| {
                matches!(
                    cause.downcast_ref::<ExecutionError>(),
                    Some(ExecutionError::TimedOut { .. })
                )
            });
            eprintln!("\n{}: {}", t!("error.label").red().bold(), e);
            std::process::exit(if timed_out { TIMEOUT_EXIT_CODE } else { 1 });
        }
    }
}
