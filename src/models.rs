// src/models.rs

use crate::constants::DEFAULT_INTERPRETER;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// --- ORDERED MAP ---

/// A string-keyed map that remembers insertion order.
///
/// Script lookup by alias, permission category order and dependency merge order
/// all follow the order in which entries were declared in the configuration, so
/// every mapping of the data model is stored in one of these. Two maps are equal
/// only if their entries are equal and in the same order.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(transparent)]
pub struct OrderedMap<V>(IndexMap<String, V>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl<V: Eq> Eq for OrderedMap<V> {}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.0.get_mut(key)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a value. An existing key keeps its position and the old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.0.insert(key.into(), value)
    }

    /// Iterates over the entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over the values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.values()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// --- CONFIGURATION MODELS (what is read from config.toml) ---

/// The deserialized configuration file. Loaded once, then only read.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Display label used in the script listing.
    pub name: Option<String>,
    /// Example values per argument name, shown in usage lines.
    #[serde(default)]
    pub arg_examples: OrderedMap<String>,
    /// Global environment values, shared by every script.
    #[serde(default)]
    pub env: OrderedMap<String>,
    /// Dependency descriptors forwarded to delegated scripts.
    #[serde(default)]
    pub dependencies: OrderedMap<DependencySpec>,
    /// The script registry.
    #[serde(default)]
    pub scripts: OrderedMap<ScriptSpec>,
    /// Command prefix of the host interpreter for `exec` scripts.
    #[serde(default)]
    pub interpreter: Option<Vec<String>>,
}

impl Config {
    /// The interpreter command prefix, falling back to `deno run`.
    pub fn interpreter(&self) -> Vec<String> {
        match &self.interpreter {
            Some(cmd) if !cmd.is_empty() => cmd.clone(),
            _ => DEFAULT_INTERPRETER.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A single entry of the `scripts` table.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ScriptSpec {
    /// Alternate name the script can be invoked by.
    pub alias: Option<String>,
    /// One-line description for the listing.
    pub desc: Option<String>,
    /// Ordered names of the positional arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Shell-style commands run in sequence.
    pub cmd: Option<CommandSpec>,
    /// Script file handed to the host interpreter when `cmd` is absent.
    pub exec: Option<String>,
    /// Working directory of the `cmd` chain.
    pub cwd: Option<PathBuf>,
    /// Permission category -> permission paths.
    #[serde(default)]
    pub allow: OrderedMap<Vec<String>>,
}

impl ScriptSpec {
    /// The name a user should type for this script: its alias, or its key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.alias.as_deref().unwrap_or(key)
    }

    /// Working directory for the command chain.
    pub fn working_dir(&self) -> &Path {
        self.cwd.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

/// A `cmd` value. Uses `untagged` so both a string and a list are accepted.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CommandSpec {
    /// `cmd = "..."`
    Single(String),
    /// `cmd = ["...", "..."]`
    Sequence(Vec<String>),
}

impl CommandSpec {
    /// The commands as an ordered list; a single string becomes one element.
    pub fn commands(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Sequence(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

/// Where a dependency comes from and which of its exports are bound.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySpec {
    /// Module specifier handed to the module loader.
    pub from: String,
    /// alias -> exported name (`"_"` means the export is named like the alias).
    #[serde(default)]
    pub import: OrderedMap<String>,
}

// --- SIDE-CHANNEL PAYLOAD ---

/// The object serialized into the side-channel variable for a delegated child.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// Argument name -> bound value.
    #[serde(default)]
    pub args: OrderedMap<String>,
    /// The global `env` table.
    #[serde(default)]
    pub env: OrderedMap<String>,
    /// Dependency descriptors, `from` already expanded.
    #[serde(default)]
    pub dependencies: OrderedMap<DependencySpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_map_keeps_declaration_order_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [scripts.zeta]
            cmd = "echo z"

            [scripts.alpha]
            cmd = ["echo a", "echo b"]

            [scripts.mid]
            exec = "./src/mid.ts"
            "#,
        )
        .unwrap();

        let keys: Vec<&str> = config.scripts.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            config.scripts.get("alpha").unwrap().cmd,
            Some(CommandSpec::Sequence(vec![
                "echo a".to_string(),
                "echo b".to_string()
            ]))
        );
    }

    #[test]
    fn test_insert_existing_key_keeps_position() {
        let mut map: OrderedMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(map.insert("a", 10), Some(1));
        let entries: Vec<(&str, &i32)> = map.iter().collect();
        assert_eq!(entries, vec![("a", &10), ("b", &2)]);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab: OrderedMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: OrderedMap<i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn test_empty_config_tolerates_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.scripts.is_empty());
        assert!(config.env.is_empty());
        assert!(config.dependencies.is_empty());
        assert_eq!(config.interpreter(), vec!["deno", "run"]);
    }

    #[test]
    fn test_script_defaults() {
        let config: Config = toml::from_str(
            r#"
            argExamples = { name = "World" }

            [scripts.greet]
            args = ["name"]
            cmd = "echo hello __name__"
            "#,
        )
        .unwrap();
        let greet = config.scripts.get("greet").unwrap();
        assert_eq!(greet.display_name("greet"), "greet");
        assert_eq!(greet.working_dir(), Path::new("."));
        assert!(greet.allow.is_empty());
        assert_eq!(config.arg_examples.get("name").map(String::as_str), Some("World"));
    }

    #[test]
    fn test_payload_json_preserves_order() {
        let raw = r#"{"args":{"b":"2","a":"1"},"env":{},"dependencies":{"m":{"from":"x","import":{"z":"_","y":"w"}}}}"#;
        let payload: Payload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.args.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        let dep = payload.dependencies.get("m").unwrap();
        assert_eq!(dep.import.keys().collect::<Vec<_>>(), vec!["z", "y"]);
        assert_eq!(serde_json::to_string(&payload).unwrap(), raw);
    }
}
