// src/system/testing.rs

use crate::system::executor::{ExecutionError, ProcessSpawner};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One recorded call to [`RecordingSpawner::spawn`].
#[derive(Debug, Clone)]
pub(crate) struct SpawnCall {
    pub(crate) command: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) env: HashMap<String, String>,
}

/// A spawner that runs nothing. It records every call and answers with the
/// exit code registered for the program name, or 0.
#[derive(Debug, Default)]
pub(crate) struct RecordingSpawner {
    codes: HashMap<String, i32>,
    calls: RefCell<Vec<SpawnCall>>,
}

impl RecordingSpawner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_code(mut self, program: &str, code: i32) -> Self {
        self.codes.insert(program.to_string(), code);
        self
    }

    pub(crate) fn calls(&self) -> Vec<SpawnCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.command.join(" "))
            .collect()
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(
        &self,
        command: &[String],
        cwd: &Path,
        env: &HashMap<String, String>,
    ) -> Result<i32, ExecutionError> {
        let program = command.first().ok_or(ExecutionError::EmptyCommand)?;
        let code = self.codes.get(program).copied().unwrap_or(0);
        self.calls.borrow_mut().push(SpawnCall {
            command: command.to_vec(),
            cwd: cwd.to_path_buf(),
            env: env.clone(),
        });
        Ok(code)
    }
}
