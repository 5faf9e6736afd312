// src/core/permissions.rs

use crate::{
    constants::{DEFAULT_NET_ALLOW, DEFAULT_READ_ALLOW, SIDE_CHANNEL_KEY},
    core::{binder::Binding, interpolator::Interpolator},
    models::{OrderedMap, ScriptSpec},
};

/// Entries appended to every composition, per category.
const DEFAULT_ALLOWS: [(&str, &str); 3] = [
    ("net", DEFAULT_NET_ALLOW),
    ("read", DEFAULT_READ_ALLOW),
    ("env", SIDE_CHANNEL_KEY),
];

/// Builds the `--allow-<category>=<paths>` flags for a delegated script.
///
/// Declared categories come first in declaration order; `net`, `read` and `env`
/// are added if missing. Each of them always gets its default entry appended.
/// The script itself is never modified, so composing twice gives the same flags.
pub fn compose(spec: &ScriptSpec, binding: &Binding, env: &OrderedMap<String>) -> Vec<String> {
    let mut allow = spec.allow.clone();
    for (category, default) in DEFAULT_ALLOWS {
        match allow.get_mut(category) {
            Some(paths) => paths.push(default.to_string()),
            None => {
                allow.insert(category, vec![default.to_string()]);
            }
        }
    }

    let interpolator = Interpolator::new(&spec.args, binding, env);
    let flags: Vec<String> = allow
        .iter()
        .map(|(category, paths)| {
            let expanded: Vec<String> = paths.iter().map(|p| interpolator.expand(p)).collect();
            format!("--allow-{}={}", category, expanded.join(","))
        })
        .collect();

    log::trace!("Composed permission flags: {:?}", flags);
    flags
}
