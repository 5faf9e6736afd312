// src/constants.rs

/// The name users type to invoke the runner. Also the prefix that marks a
/// command as a reference to another script (`"dr other-script"`).
pub const EXECUTABLE_NAME: &str = "dr";

/// Prefix of a command string that delegates to another script's `cmd`.
pub const DELEGATION_PREFIX: &str = "dr ";

/// The environment variable that carries the serialized payload to a delegated child.
pub const SIDE_CHANNEL_KEY: &str = "dr";

/// The configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "DR_CONFIG";

/// Host interpreter used for `exec` scripts when the configuration names none.
pub const DEFAULT_INTERPRETER: &[&str] = &["deno", "run"];

/// Remote host the interpreter fetches its standard modules from.
pub const DEFAULT_NET_ALLOW: &str = "deno.land";

/// Source directory delegated scripts may always read.
pub const DEFAULT_READ_ALLOW: &str = "./src";

/// Sentinel substituted for a placeholder that has no value.
pub const UNRESOLVED_PLACEHOLDER: &str = "error";

/// Return code used when a child outlives the `--timeout` bound.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Import value meaning "the export has the same name as the alias".
pub const EXPORT_SAME_AS_ALIAS: &str = "_";
