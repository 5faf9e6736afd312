// src/system/executor.rs

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// A command that produced no exit code.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The command vector was empty.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The program could not be started or waited on.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The child outlived the timeout and was killed.
    #[error("Command '{command}' did not finish within {secs}s and was killed.", secs = .timeout.as_secs())]
    TimedOut {
        /// The command line.
        command: String,
        /// The limit that was exceeded.
        timeout: Duration,
    },
}

/// The process-spawning primitive: runs a command vector to completion and
/// reports its exit code. Implemented by [`SystemSpawner`] for real processes.
pub trait ProcessSpawner {
    /// Spawns `command` (program followed by its arguments) in `cwd` with the
    /// extra variables in `env`, blocks until it exits and returns its code.
    fn spawn(
        &self,
        command: &[String],
        cwd: &Path,
        env: &HashMap<String, String>,
    ) -> Result<i32, ExecutionError>;
}

/// Spawns real OS processes that inherit stdio and the runner's environment.
#[derive(Debug, Clone, Default)]
pub struct SystemSpawner {
    timeout: Option<Duration>,
}

impl SystemSpawner {
    /// A spawner that waits for children without a time limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills any child that runs longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessSpawner for SystemSpawner {
    fn spawn(
        &self,
        command: &[String],
        cwd: &Path,
        env: &HashMap<String, String>,
    ) -> Result<i32, ExecutionError> {
        let (program, args) = command.split_first().ok_or(ExecutionError::EmptyCommand)?;
        let command_line = command.join(" ");
        let clean_cwd = dunce::simplified(cwd);

        let mut process = StdCommand::new(program);
        process
            .args(args)
            .current_dir(clean_cwd)
            .envs(env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Windows built-ins like `echo` are not executables; retry through `cmd /C`.
        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
                log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
                StdCommand::new("cmd")
                    .arg("/C")
                    .arg(&command_line)
                    .current_dir(clean_cwd)
                    .envs(env)
                    .spawn()
                    .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?
            }
            Err(e) => return Err(ExecutionError::CommandFailed(command_line, e)),
        };
        log::debug!("Spawned '{}' (PID: {})", command_line, child.id());

        let status = match self.timeout {
            None => child
                .wait()
                .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?,
            Some(timeout) => wait_with_timeout(&mut child, &command_line, timeout)?,
        };

        let code = exit_code(status);
        log::debug!("'{}' exited with code {}", command_line, code);
        Ok(code)
    }
}

/// Polls the child until it exits or `timeout` elapses, killing it in the latter case.
fn wait_with_timeout(
    child: &mut Child,
    command_line: &str,
    timeout: Duration,
) -> Result<ExitStatus, ExecutionError> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if started.elapsed() >= timeout {
                    log::debug!(
                        "Timeout reached, killing child process (PID: {})...",
                        child.id()
                    );
                    if let Err(e) = child.kill() {
                        log::warn!("Failed to kill child process {}: {}", child.id(), e);
                    }
                    child.wait().ok();
                    return Err(ExecutionError::TimedOut {
                        command: command_line.to_string(),
                        timeout,
                    });
                }
                // Wait briefly to avoid a tight loop consuming CPU.
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return Err(ExecutionError::CommandFailed(command_line.to_string(), e));
            }
        }
    }
}

/// Maps an exit status to a shell-style code: a signal `N` becomes `128 + N`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
