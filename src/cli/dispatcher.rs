use anyhow::Result;
use colored::*;

use crate::{
    cli::usage,
    core::{
        binder::{self, Binding},
        launcher,
        resolver::{self, ResolvedScript},
        task_executor,
    },
    models::Config,
    system::executor::ProcessSpawner,
};

/// What an invocation turns into. Exactly one of these happens per run.
#[derive(Debug)]
pub enum Invocation<'a> {
    /// No script named, or the name matches nothing: show every script.
    Listing,
    /// The script exists but the argument count is wrong: show its usage.
    Usage(ResolvedScript<'a>),
    /// Resolution and arity both succeeded.
    Execute {
        script: ResolvedScript<'a>,
        binding: Binding,
    },
}

/// Decides what to do with `dr [script] [args...]` without running anything.
pub fn plan<'a>(config: &'a Config, script: Option<&str>, args: &[String]) -> Invocation<'a> {
    let Some(name) = script else {
        return Invocation::Listing;
    };
    let Some(resolved) = resolver::resolve(&config.scripts, name) else {
        return Invocation::Listing;
    };

    match binder::bind(resolved.spec, args) {
        Ok(binding) => Invocation::Execute {
            script: resolved,
            binding,
        },
        Err(mismatch) => {
            log::debug!("Script '{}': {}", resolved.key, mismatch);
            Invocation::Usage(resolved)
        }
    }
}

/// The main application dispatcher. Returns the exit code for the process:
/// 0 for the informational outcomes, the child's code otherwise.
pub fn dispatch(
    config: &Config,
    script: Option<&str>,
    args: &[String],
    spawner: &dyn ProcessSpawner,
) -> Result<i32> {
    log::debug!("Dispatching script {:?} with args {:?}", script, args);

    match plan(config, script, args) {
        Invocation::Listing => {
            print!("{}", usage::render_listing(config));
            Ok(0)
        }
        Invocation::Usage(resolved) => {
            print!(
                "{}",
                usage::render_script_usage(config, resolved.key, resolved.spec)
            );
            Ok(0)
        }
        Invocation::Execute { script, binding } => execute(config, script, &binding, spawner),
    }
}

/// Runs a resolved script: the `cmd` chain if present, otherwise the delegated `exec`.
fn execute(
    config: &Config,
    script: ResolvedScript<'_>,
    binding: &Binding,
    spawner: &dyn ProcessSpawner,
) -> Result<i32> {
    let spec = script.spec;
    if let Some(cmd) = &spec.cmd {
        log::debug!("Running '{}' as a command chain.", script.key);
        return Ok(task_executor::run_chain(config, spec, cmd, binding, spawner)?);
    }
    if let Some(exec) = &spec.exec {
        log::debug!("Running '{}' as a delegated script.", script.key);
        return Ok(launcher::launch(config, spec, exec, binding, spawner)?);
    }

    println!(
        "{}",
        format!("'{}' {}", script.key, t!("run.nothing_to_execute")).yellow()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::RecordingSpawner;

    fn config() -> Config {
        toml::from_str(
            r#"
            [scripts.greet]
            alias = "hi"
            args = ["name"]
            cmd = "echo hello __name__"

            [scripts.fetch]
            exec = "./src/fetch.ts"

            [scripts.both]
            cmd = "true"
            exec = "./src/ignored.ts"

            [scripts.empty]
            desc = "nothing here"
            "#,
        )
        .unwrap()
    }

    fn to_args(params: &[&str]) -> Vec<String> {
        params.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_outcomes() {
        let config = config();
        assert!(matches!(plan(&config, None, &[]), Invocation::Listing));
        assert!(matches!(plan(&config, Some("nope"), &[]), Invocation::Listing));
        assert!(matches!(plan(&config, Some(""), &[]), Invocation::Listing));
        assert!(matches!(plan(&config, Some("greet"), &[]), Invocation::Usage(_)));
        assert!(matches!(
            plan(&config, Some("hi"), &to_args(&["a", "b"])),
            Invocation::Usage(s) if s.key == "greet"
        ));
        assert!(matches!(
            plan(&config, Some("hi"), &to_args(&["Ada"])),
            Invocation::Execute { ref script, .. } if script.key == "greet"
        ));
    }

    #[test]
    fn test_greet_end_to_end() {
        let config = config();
        let spawner = RecordingSpawner::new();

        assert_eq!(dispatch(&config, Some("greet"), &[], &spawner).unwrap(), 0);
        assert_eq!(
            dispatch(&config, Some("greet"), &to_args(&["a", "b"]), &spawner).unwrap(),
            0
        );
        assert!(spawner.calls().is_empty());

        assert_eq!(
            dispatch(&config, Some("greet"), &to_args(&["Ada"]), &spawner).unwrap(),
            0
        );
        assert_eq!(spawner.programs(), vec!["echo hello Ada"]);
    }

    #[test]
    fn test_unknown_script_lists_and_runs_nothing() {
        let config = config();
        let spawner = RecordingSpawner::new();
        assert_eq!(dispatch(&config, Some("deploy"), &[], &spawner).unwrap(), 0);
        assert_eq!(dispatch(&config, None, &[], &spawner).unwrap(), 0);
        assert!(spawner.calls().is_empty());
    }

    #[test]
    fn test_exit_codes_are_propagated() {
        let config = config();
        let spawner = RecordingSpawner::new().with_code("echo", 2).with_code("deno", 42);
        assert_eq!(
            dispatch(&config, Some("greet"), &to_args(&["x"]), &spawner).unwrap(),
            2
        );
        assert_eq!(dispatch(&config, Some("fetch"), &[], &spawner).unwrap(), 42);
    }

    #[test]
    fn test_cmd_takes_precedence_over_exec() {
        let config = config();
        let spawner = RecordingSpawner::new();
        dispatch(&config, Some("both"), &[], &spawner).unwrap();
        assert_eq!(spawner.programs(), vec!["true"]);
    }

    #[test]
    fn test_script_without_cmd_or_exec_does_nothing() {
        let config = config();
        let spawner = RecordingSpawner::new();
        assert_eq!(dispatch(&config, Some("empty"), &[], &spawner).unwrap(), 0);
        assert!(spawner.calls().is_empty());
    }
}
