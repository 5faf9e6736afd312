// src/core/interpolator.rs

use crate::{constants::UNRESOLVED_PLACEHOLDER, core::binder::Binding, models::OrderedMap};

/// Expands `__arg__` and `..env..` placeholders for one invocation.
///
/// Substitution is textual and runs in two passes: first every declared
/// argument, then every global env key. A declared argument without a bound
/// value expands to the `"error"` sentinel instead of failing; the malformed
/// result is rejected where it is used (e.g. by the sandbox at spawn time).
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    arg_names: &'a [String],
    binding: &'a Binding,
    env: &'a OrderedMap<String>,
}

impl<'a> Interpolator<'a> {
    /// Borrows the declared argument names, their bound values and the global env.
    pub fn new(arg_names: &'a [String], binding: &'a Binding, env: &'a OrderedMap<String>) -> Self {
        Self {
            arg_names,
            binding,
            env,
        }
    }

    /// Expands every placeholder in `template`.
    pub fn expand(&self, template: &str) -> String {
        let with_args = self.arg_names.iter().fold(template.to_string(), |acc, name| {
            let value = self
                .binding
                .get(name)
                .map(String::as_str)
                .unwrap_or(UNRESOLVED_PLACEHOLDER);
            acc.replace(&format!("__{}__", name), value)
        });

        self.env.iter().fold(with_args, |acc, (key, value)| {
            acc.replace(&format!("..{}..", key), value)
        })
    }
}
