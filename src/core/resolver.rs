// src/core/resolver.rs

use crate::models::{OrderedMap, ScriptSpec};

/// A script found in the registry, together with the key it is registered under.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedScript<'a> {
    /// The registry key, even when the script was found by alias.
    pub key: &'a str,
    /// The script entry.
    pub spec: &'a ScriptSpec,
}

/// Finds a script by exact key, then by the first script whose `alias` matches.
///
/// Returns `None` for an empty name, an empty registry or no match; the caller
/// treats that as a request for the full listing, not as an error.
pub fn resolve<'a>(scripts: &'a OrderedMap<ScriptSpec>, name: &str) -> Option<ResolvedScript<'a>> {
    if name.is_empty() || scripts.is_empty() {
        return None;
    }

    if let Some((key, spec)) = scripts.iter().find(|(key, _)| *key == name) {
        log::debug!("Script '{}' resolved by key.", key);
        return Some(ResolvedScript { key, spec });
    }

    let found = scripts
        .iter()
        .find(|(_, spec)| spec.alias.as_deref() == Some(name))
        .map(|(key, spec)| ResolvedScript { key, spec });
    match &found {
        Some(script) => log::debug!("'{}' resolved as an alias of '{}'.", name, script.key),
        None => log::debug!("No script or alias named '{}'.", name),
    }
    found
}
