//! Binds positional values to declared argument names.

use crate::models::{OrderedMap, ScriptSpec};
use thiserror::Error;

/// Argument name -> value, in declaration order.
pub type Binding = OrderedMap<String>;

/// The number of values differs from the number of declared arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Expected {expected} argument(s), got {actual}.")]
pub struct ArityMismatch {
    /// Declared argument count.
    pub expected: usize,
    /// Supplied value count.
    pub actual: usize,
}

/// Binds positional values to the script's declared argument names.
///
/// The number of values must match the declaration exactly.
pub fn bind(spec: &ScriptSpec, values: &[String]) -> Result<Binding, ArityMismatch> {
    if spec.args.len() != values.len() {
        return Err(ArityMismatch {
            expected: spec.args.len(),
            actual: values.len(),
        });
    }

    Ok(spec
        .args
        .iter()
        .zip(values)
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect())
}
