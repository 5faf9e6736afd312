//! # Module Loaders
//!
//! A module loader turns a module specifier into the set of values the module
//! exports. The dependency bridge only depends on the [`ModuleLoader`] trait;
//! two implementations ship with the crate:
//!
//! - [`JsonModuleLoader`] reads a JSON file whose top-level object is the export set.
//! - [`MemoryModuleLoader`] serves modules registered in memory, for embedding.

use serde_json::Value;
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Export name -> exported value.
pub type Exports = serde_json::Map<String, Value>;

/// A module that could not be turned into exports.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Nothing exists at the specifier.
    #[error("module '{0}' was not found")]
    NotFound(String),
    /// The module exists but reading it failed.
    #[error("module '{specifier}' could not be read: {source}")]
    Io {
        /// The requested module.
        specifier: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The module text is not JSON.
    #[error("module '{specifier}' is not valid JSON: {source}")]
    Parse {
        /// The requested module.
        specifier: String,
        /// The parser's diagnostic.
        #[source]
        source: serde_json::Error,
    },
    /// The module is JSON, but not an object.
    #[error("module '{0}' must be a JSON object of named exports")]
    NotAnObject(String),
}

/// Resolves a module specifier to its exports. Loads may run on several
/// threads at once, hence the `Sync` bound.
pub trait ModuleLoader: Sync {
    /// Loads the module named by `specifier` and returns its exports.
    fn load(&self, specifier: &str) -> Result<Exports, LoadError>;
}

/// Loads `.json` modules from disk, relative to a base directory.
#[derive(Debug, Clone)]
pub struct JsonModuleLoader {
    base_dir: PathBuf,
}

impl JsonModuleLoader {
    /// A loader resolving relative specifiers against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve_path(&self, specifier: &str) -> PathBuf {
        let path = Path::new(specifier.strip_prefix("file://").unwrap_or(specifier));
        self.base_dir.join(path)
    }
}

impl Default for JsonModuleLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ModuleLoader for JsonModuleLoader {
    fn load(&self, specifier: &str) -> Result<Exports, LoadError> {
        let path = self.resolve_path(specifier);
        log::debug!("Loading module '{}' from '{}'", specifier, path.display());

        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                LoadError::NotFound(specifier.to_string())
            } else {
                LoadError::Io {
                    specifier: specifier.to_string(),
                    source,
                }
            }
        })?;

        match serde_json::from_str(&content) {
            Ok(Value::Object(exports)) => Ok(exports),
            Ok(_) => Err(LoadError::NotAnObject(specifier.to_string())),
            Err(source) => Err(LoadError::Parse {
                specifier: specifier.to_string(),
                source,
            }),
        }
    }
}

/// Serves modules from an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryModuleLoader {
    modules: HashMap<String, Exports>,
}

impl MemoryModuleLoader {
    /// An empty module table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `exports` under `specifier`, replacing any previous module.
    pub fn with_module(mut self, specifier: impl Into<String>, exports: Exports) -> Self {
        self.modules.insert(specifier.into(), exports);
        self
    }
}

impl ModuleLoader for MemoryModuleLoader {
    fn load(&self, specifier: &str) -> Result<Exports, LoadError> {
        self.modules
            .get(specifier)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(specifier.to_string()))
    }
}
