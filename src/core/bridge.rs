//! # Dependency Bridge
//!
//! The child-side half of a delegated launch. A program started by `dr` calls
//! [`bootstrap`] at startup to get back the arguments, global environment and
//! resolved dependencies the runner sent through the side-channel variable.
//!
//! Each dependency entry `key -> {from, import}` is loaded through a
//! [`ModuleLoader`]; every `alias -> export` pair of `import` binds `alias` to
//! the module's export of that name (`"_"` means the export is named like the
//! alias). Loads run concurrently on the rayon pool, and the combined namespace
//! keeps the declaration order of the `dependencies` table.

use crate::{
    constants::{EXPORT_SAME_AS_ALIAS, SIDE_CHANNEL_KEY},
    core::loader::{LoadError, ModuleLoader},
    dev_utils,
    models::{DependencySpec, OrderedMap, Payload},
};
use rayon::prelude::*;
use serde_json::Value;
use std::env;
use thiserror::Error;

/// A dependency that could not be bound.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The loader rejected the module.
    #[error("Dependency '{key}' failed to load: {source}")]
    Load {
        /// The dependency key.
        key: String,
        /// What the loader reported.
        #[source]
        source: LoadError,
    },
    /// An import names an export the module does not have.
    #[error("Dependency '{key}': module '{specifier}' has no export named '{export}'.")]
    MissingExport {
        /// The dependency key.
        key: String,
        /// The module that was loaded.
        specifier: String,
        /// The export that was asked for.
        export: String,
    },
}

/// Everything a delegated script receives from the runner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeContext {
    /// Argument name -> value.
    pub args: OrderedMap<String>,
    /// The global `env` table of the configuration.
    pub env: OrderedMap<String>,
    /// Dependency key -> (alias -> bound export).
    pub dependencies: OrderedMap<OrderedMap<Value>>,
}

impl BridgeContext {
    /// Looks up a bound export, e.g. `dependency("math", "add")`.
    pub fn dependency(&self, key: &str, alias: &str) -> Option<&Value> {
        self.dependencies.get(key).and_then(|ns| ns.get(alias))
    }
}

/// Reads the side-channel variable from the process environment and rebuilds the context.
pub fn bootstrap<L: ModuleLoader + ?Sized>(loader: &L) -> Result<BridgeContext, BridgeError> {
    let raw = env::var(SIDE_CHANNEL_KEY).ok();
    bootstrap_from(raw.as_deref(), loader)
}

/// Rebuilds the context from raw payload text.
pub fn bootstrap_from<L: ModuleLoader + ?Sized>(
    raw: Option<&str>,
    loader: &L,
) -> Result<BridgeContext, BridgeError> {
    let payload = read_payload(raw);
    let dependencies = resolve_dependencies(&payload.dependencies, loader)?;
    Ok(BridgeContext {
        args: payload.args,
        env: payload.env,
        dependencies,
    })
}

/// Parses the payload. An absent or unparseable payload is an empty one.
pub fn read_payload(raw: Option<&str>) -> Payload {
    let Some(text) = raw else {
        log::debug!("No '{}' variable set; starting with an empty payload.", SIDE_CHANNEL_KEY);
        return Payload::default();
    };
    serde_json::from_str(text).unwrap_or_else(|e| {
        log::warn!("Ignoring unparseable '{}' payload: {}", SIDE_CHANNEL_KEY, e);
        Payload::default()
    })
}

/// Loads every dependency concurrently and merges the results in declaration order.
/// The first failing entry fails the whole resolution.
pub fn resolve_dependencies<L: ModuleLoader + ?Sized>(
    dependencies: &OrderedMap<DependencySpec>,
    loader: &L,
) -> Result<OrderedMap<OrderedMap<Value>>, BridgeError> {
    let _timer = dev_utils::BlockTimer::new("bridge::resolve_dependencies");
    let entries: Vec<(&str, &DependencySpec)> = dependencies.iter().collect();

    let resolved = entries
        .par_iter()
        .map(|(key, dep)| resolve_one(key, dep, loader).map(|ns| (key.to_string(), ns)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(resolved.into_iter().collect())
}

fn resolve_one<L: ModuleLoader + ?Sized>(
    key: &str,
    dep: &DependencySpec,
    loader: &L,
) -> Result<OrderedMap<Value>, BridgeError> {
    log::trace!("Resolving dependency '{}' from '{}'", key, dep.from);
    let exports = loader.load(&dep.from).map_err(|source| BridgeError::Load {
        key: key.to_string(),
        source,
    })?;

    dep.import
        .iter()
        .map(|(alias, export)| {
            let name = if export == EXPORT_SAME_AS_ALIAS {
                alias
            } else {
                export.as_str()
            };
            exports
                .get(name)
                .cloned()
                .map(|value| (alias, value))
                .ok_or_else(|| BridgeError::MissingExport {
                    key: key.to_string(),
                    specifier: dep.from.clone(),
                    export: name.to_string(),
                })
        })
        .collect()
}
