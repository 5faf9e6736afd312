// src/core/launcher.rs

use crate::{
    constants::SIDE_CHANNEL_KEY,
    core::{binder::Binding, interpolator::Interpolator, permissions},
    models::{Config, DependencySpec, Payload, ScriptSpec},
    system::executor::{ExecutionError, ProcessSpawner},
};
use colored::*;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// A delegated launch that never produced an exit code.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The payload could not be encoded.
    #[error("Failed to serialize the payload for the delegated script: {0}")]
    Payload(#[from] serde_json::Error),
    /// The interpreter could not be run.
    #[error("{0}")]
    Execution(#[from] ExecutionError),
}

/// Builds the side-channel payload for an invocation.
///
/// Placeholders in each dependency's `from` specifier are expanded with the
/// same rules as permission paths.
pub fn build_payload(config: &Config, spec: &ScriptSpec, binding: &Binding) -> Payload {
    let interpolator = Interpolator::new(&spec.args, binding, &config.env);
    let dependencies = config
        .dependencies
        .iter()
        .map(|(key, dep)| {
            (
                key,
                DependencySpec {
                    from: interpolator.expand(&dep.from),
                    import: dep.import.clone(),
                },
            )
        })
        .collect();

    Payload {
        args: binding.clone(),
        env: config.env.clone(),
        dependencies,
    }
}

/// Builds the full interpreter command line: interpreter, permission flags, script path.
pub fn build_command(config: &Config, spec: &ScriptSpec, exec: &str, binding: &Binding) -> Vec<String> {
    let mut command = config.interpreter();
    command.extend(permissions::compose(spec, binding, &config.env));
    command.push(exec.to_string());
    command
}

/// Spawns the host interpreter on `exec` and returns the child's exit code verbatim.
///
/// The serialized payload travels in the side-channel variable; the child
/// otherwise inherits the runner's environment and working directory.
pub fn launch(
    config: &Config,
    spec: &ScriptSpec,
    exec: &str,
    binding: &Binding,
    spawner: &dyn ProcessSpawner,
) -> Result<i32, LaunchError> {
    let payload = serde_json::to_string(&build_payload(config, spec, binding))?;
    let command = build_command(config, spec, exec, binding);
    log::debug!("Delegated command: {:?}", command);
    log::trace!("Side-channel payload: {}", payload);

    let env = HashMap::from([(SIDE_CHANNEL_KEY.to_string(), payload)]);

    println!("\n{} {}\n", t!("run.launching").green(), exec.green());
    let code = spawner.spawn(&command, Path::new("."), &env)?;
    println!();

    Ok(code)
}
