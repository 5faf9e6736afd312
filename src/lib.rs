//! `dr`: a configuration-driven script runner.
//!
//! Scripts are declared in `config.toml` and run either as a chain of external
//! commands or as a sandboxed interpreter process that receives its arguments,
//! environment and dependency descriptors through a side-channel variable.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Argument parsing, script listings and the invocation dispatcher.
pub mod cli;
/// Reserved names and defaults.
pub mod constants;
/// Resolution, binding, substitution and the two execution paths.
pub mod core;
/// Profiling helpers.
pub mod dev_utils;
/// The configuration data model and the side-channel payload.
pub mod models;
/// Process spawning.
pub mod system;
