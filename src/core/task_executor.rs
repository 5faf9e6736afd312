use crate::{
    constants::DELEGATION_PREFIX,
    core::{binder::Binding, interpolator::Interpolator},
    models::{CommandSpec, Config, ScriptSpec},
    system::executor::{ExecutionError, ProcessSpawner},
};
use colored::*;
use std::collections::HashMap;
use thiserror::Error;

/// A command chain that stopped without a child exit code.
#[derive(Error, Debug)]
pub enum ChainError {
    /// A `dr <script>` command names no script with a `cmd`.
    #[error("Command '{command}' refers to script '{target}', which does not exist or has no 'cmd'.")]
    UnresolvedReference {
        /// The command as written.
        command: String,
        /// The script it refers to.
        target: String,
    },
    /// A command could not be spawned.
    #[error("{0}")]
    Execution(#[from] ExecutionError),
}

// --- Main Public Function ---

/// Runs the commands of `cmd` one after another, in `spec`'s working directory.
///
/// A command of the form `dr <script>` is replaced by that script's own `cmd`
/// (one level only: the replacement is not scanned again). Placeholders are
/// expanded, the result is split on whitespace and spawned. The first nonzero
/// exit code stops the chain and is returned; otherwise the result is 0.
pub fn run_chain(
    config: &Config,
    spec: &ScriptSpec,
    cmd: &CommandSpec,
    binding: &Binding,
    spawner: &dyn ProcessSpawner,
) -> Result<i32, ChainError> {
    let interpolator = Interpolator::new(&spec.args, binding, &config.env);
    let no_extra_env = HashMap::new();

    for command in cmd.commands() {
        for step in expand_reference(config, command)? {
            let rendered = interpolator.expand(step);
            let parts: Vec<String> = rendered.split_whitespace().map(str::to_string).collect();
            if parts.is_empty() {
                log::debug!("Skipping blank command.");
                continue;
            }

            println!("\n{} {}\n", t!("run.launching").green(), parts.join(" ").green());
            let code = spawner.spawn(&parts, spec.working_dir(), &no_extra_env)?;
            println!();

            if code != 0 {
                log::debug!("'{}' failed with code {}; stopping the chain.", rendered, code);
                return Ok(code);
            }
        }
    }

    Ok(0)
}

// --- Reference Expansion ---

/// Resolves a `dr <script>` reference to the commands of the referenced script.
/// Any other command is returned unchanged.
fn expand_reference<'a>(config: &'a Config, command: &'a str) -> Result<Vec<&'a str>, ChainError> {
    let Some(target) = command.strip_prefix(DELEGATION_PREFIX) else {
        return Ok(vec![command]);
    };
    let target = target.trim();

    let referenced = config
        .scripts
        .get(target)
        .and_then(|script| script.cmd.as_ref())
        .ok_or_else(|| ChainError::UnresolvedReference {
            command: command.to_string(),
            target: target.to_string(),
        })?;
    log::debug!("'{}' expands to the commands of script '{}'.", command, target);
    Ok(referenced.commands())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::RecordingSpawner;
    use std::path::Path;

    fn config(toml_text: &str) -> Config {
        toml::from_str(toml_text).unwrap()
    }

    fn run(config: &Config, key: &str, binding: &Binding, spawner: &RecordingSpawner) -> Result<i32, ChainError> {
        let spec = config.scripts.get(key).unwrap();
        run_chain(config, spec, spec.cmd.as_ref().unwrap(), binding, spawner)
    }

    #[test]
    fn test_chain_short_circuits_on_failure() {
        let config = config(
            r#"
            [scripts.ci]
            cmd = ["true", "fail --hard", "true again"]
            "#,
        );
        let spawner = RecordingSpawner::new().with_code("fail", 3);
        let code = run(&config, "ci", &Binding::new(), &spawner).unwrap();
        assert_eq!(code, 3);
        assert_eq!(spawner.programs(), vec!["true", "fail --hard"]);
    }

    #[test]
    fn test_chain_success_returns_zero() {
        let config = config(
            r#"
            [scripts.ci]
            cmd = ["cargo fmt", "cargo   test  --all"]
            cwd = "./backend"
            "#,
        );
        let spawner = RecordingSpawner::new();
        let code = run(&config, "ci", &Binding::new(), &spawner).unwrap();
        assert_eq!(code, 0);
        let calls = spawner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].command, vec!["cargo", "test", "--all"]);
        assert_eq!(calls[0].cwd, Path::new("./backend"));
        assert!(calls[0].env.is_empty());
    }

    #[test]
    fn test_single_string_cmd_with_placeholders() {
        let config = config(
            r#"
            [env]
            GREETING = "hello"

            [scripts.greet]
            args = ["name"]
            cmd = "echo ..GREETING.. __name__"
            "#,
        );
        let binding: Binding = [("name", "World".to_string())].into_iter().collect();
        let spawner = RecordingSpawner::new();
        assert_eq!(run(&config, "greet", &binding, &spawner).unwrap(), 0);
        assert_eq!(spawner.programs(), vec!["echo hello World"]);
    }

    #[test]
    fn test_reference_is_expanded_one_level_only() {
        let config = config(
            r#"
            [scripts.lint]
            cmd = ["eslint .", "dr fmt"]

            [scripts.fmt]
            cmd = "prettier --check ."

            [scripts.all]
            cmd = ["dr lint", "echo done"]
            "#,
        );
        let spawner = RecordingSpawner::new();
        run(&config, "all", &Binding::new(), &spawner).unwrap();
        // `dr fmt` inside the referenced list is spawned literally, not expanded again.
        assert_eq!(spawner.programs(), vec!["eslint .", "dr fmt", "echo done"]);
    }

    #[test]
    fn test_unresolved_reference_is_an_error() {
        let config = config(
            r#"
            [scripts.all]
            cmd = ["true", "dr missing"]

            [scripts.delegated]
            exec = "./src/main.ts"

            [scripts.other]
            cmd = "dr delegated"
            "#,
        );
        let spawner = RecordingSpawner::new();
        let result = run(&config, "all", &Binding::new(), &spawner);
        assert!(matches!(result, Err(ChainError::UnresolvedReference { ref target, .. }) if target == "missing"));
        assert_eq!(spawner.programs(), vec!["true"]);

        let result = run(&config, "other", &Binding::new(), &spawner);
        assert!(matches!(result, Err(ChainError::UnresolvedReference { .. })));
    }

    #[test]
    fn test_blank_command_is_skipped() {
        let config = config(
            r#"
            [scripts.gap]
            cmd = ["   ", "true"]
            "#,
        );
        let spawner = RecordingSpawner::new();
        assert_eq!(run(&config, "gap", &Binding::new(), &spawner).unwrap(), 0);
        assert_eq!(spawner.programs(), vec!["true"]);
    }
}
