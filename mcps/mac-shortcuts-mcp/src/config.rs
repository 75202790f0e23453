//! Configuration file loading
//!
//! Settings come from built-in defaults, then an optional TOML file, then CLI
//! flags. The file is searched in order:
//! 1. `--config <path>` or the `SHORTCUTS_MCP_CONFIG` env var
//! 2. `./mac-shortcuts-mcp.toml`
//! 3. `$XDG_CONFIG_HOME/mac-shortcuts-mcp/config.toml`
//! 4. `~/.mac-shortcuts-mcp.toml`
//!
//! An explicitly named file must exist and parse. Files found by searching
//! are skipped with a warning when they cannot be read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::{ShortcutRunner, DEFAULT_PROGRAM};

const LOCAL_CONFIG_FILE: &str = "mac-shortcuts-mcp.toml";
const CONFIG_DIR_NAME: &str = "mac-shortcuts-mcp";
const HOME_CONFIG_FILE: &str = ".mac-shortcuts-mcp.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Executable name searched on PATH, or a path to it
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

impl RunnerConfig {
    pub fn runner(&self) -> ShortcutRunner {
        ShortcutRunner::new().with_program(&self.program)
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub json_response: bool,
    #[serde(default)]
    pub stateless: bool,
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub certfile: Option<PathBuf>,
    #[serde(default)]
    pub keyfile: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            json_response: false,
            stateless: false,
            allowed_hosts: Vec::new(),
            allowed_origins: Vec::new(),
            certfile: None,
            keyfile: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// Seconds in-flight calls get to finish after a shutdown signal
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_secs: default_grace_secs(),
        }
    }
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}

fn default_grace_secs() -> u64 {
    mcp_common::shutdown::DEFAULT_GRACE_PERIOD.as_secs()
}

impl Config {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit` if given, otherwise from the first usable
    /// standard location, otherwise defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        for path in search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return Ok(config);
                }
                Err(e) => tracing::warn!("Skipping config: {}", e),
            }
        }

        tracing::debug!("Using default configuration");
        Ok(Self::default())
    }
}

/// Standard config locations, in search order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_DIR_NAME).join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(HOME_CONFIG_FILE));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.runner.program, "shortcuts");
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8000);
        assert!(!config.http.json_response);
        assert_eq!(config.shutdown.grace_period(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [http]
            port = 9001
            allowed_hosts = ["localhost:*"]
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, 9001);
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.allowed_hosts, vec!["localhost:*"]);
        assert_eq!(config.runner, RunnerConfig::default());
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[runner]\nprogram = \"/opt/bin/shortcuts\"\n\n[shutdown]\ngrace_secs = 1\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.runner.runner().program(), "/opt/bin/shortcuts");
        assert_eq!(config.shutdown.grace_secs, 1);
    }

    #[test]
    fn test_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[http\nport = ").unwrap();
        assert!(matches!(
            Config::load(Some(&broken)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_search_paths_start_local() {
        let paths = search_paths();
        assert_eq!(paths[0], PathBuf::from("mac-shortcuts-mcp.toml"));
    }
}
