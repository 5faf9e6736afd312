// src/core/mod.rs

pub mod binder;
pub mod bridge;
pub mod config_loader;
/// Placeholder substitution.
pub mod interpolator;
/// Delegated launch of `exec` scripts.
pub mod launcher;
pub mod loader;
/// Sandbox permission flags.
pub mod permissions;
/// Script lookup by key or alias.
pub mod resolver;
/// Sequential execution of `cmd` chains.
pub mod task_executor;
