//! # Config Loader
//!
//! Reads the configuration file once at startup. The result is an immutable
//! [`Config`] value that the binary passes by reference to every component;
//! nothing else in the crate touches the file.

use crate::{
    constants::CONFIG_PATH_ENV,
    dev_utils,
    models::Config,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Why the configuration could not be loaded. Either one is fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file is missing or unreadable.
    #[error("No configuration file found at '{shown}': {source}", shown = .path.display())]
    Unreadable {
        /// The path that was tried.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for the data model.
    #[error("Failed to parse '{shown}': {source}", shown = .path.display())]
    Invalid {
        /// The path that was read.
        path: PathBuf,
        /// The parser's diagnostic.
        #[source]
        source: toml::de::Error,
    },
}

/// Loads and parses the configuration at `path`. An empty file is an empty configuration.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let _timer = dev_utils::BlockTimer::new("config_loader::load");
    log::debug!(
        "Loading configuration from '{}' (override with {})",
        path.display(),
        CONFIG_PATH_ENV
    );

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration text.
pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    let config: Config = toml::from_str(content)?;
    log::debug!(
        "Configuration '{}' declares {} script(s), {} env value(s), {} dependenc(ies)",
        config.name.as_deref().unwrap_or_default(),
        config.scripts.len(),
        config.env.len(),
        config.dependencies.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
            name = "demo"

            [env]
            HOST = "example.com"

            [scripts.greet]
            alias = "g"
            args = ["name"]
            cmd = "echo hello __name__"
            "#,
        )
        .unwrap();
        file.flush().unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("demo"));
        assert_eq!(config.env.get("HOST").map(String::as_str), Some("example.com"));
        assert_eq!(
            config.scripts.get("greet").unwrap().alias.as_deref(),
            Some("g")
        );
    }

    #[test]
    fn test_load_empty_file_is_empty_config() {
        let file = NamedTempFile::new().unwrap();
        let config = load(file.path()).unwrap();
        assert!(config.scripts.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("config.toml"));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[scripts.broken\ncmd = ").unwrap();
        file.flush().unwrap();
        let result = load(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
