//! # System Interaction Layer
//!
//! The boundary between the runner's logic and the operating system.
//!
//! - **`executor`**: spawns external processes behind the [`executor::ProcessSpawner`]
//!   trait, blocks until they exit and reports their exit codes. The core only
//!   ever talks to the trait, so tests substitute a recording fake.

/// Process spawning behind the `ProcessSpawner` trait.
pub mod executor;

#[cfg(test)]
pub(crate) mod testing;
