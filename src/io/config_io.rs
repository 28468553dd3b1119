use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::io::store::StoreOptions;
use crate::model::config::Config;

const APP_DIR: &str = "tally";

/// Error type for reading the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `$XDG_CONFIG_HOME/tally/config.toml` (or the platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// `$XDG_DATA_HOME/tally`, falling back to the current directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load config from `explicit`, or from the default location.
///
/// A missing default file yields defaults. A missing explicit file is an
/// error, as is a file that does not parse.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(Config::default()),
        },
    };
    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;
    parse_config(&text, &path)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Database path: `--db` wins, then `[store] path`, then the data dir
pub fn resolve_store_path(config: &Config, cli_db: Option<&Path>) -> PathBuf {
    if let Some(p) = cli_db {
        return p.to_path_buf();
    }
    match &config.store.path {
        Some(p) => expand_home(p),
        None => default_data_dir().join("tally.db"),
    }
}

/// Directory the log file is written to
pub fn resolve_log_dir(config: &Config) -> PathBuf {
    match &config.log.dir {
        Some(p) => expand_home(p),
        None => default_data_dir(),
    }
}

/// Store options taken from the `[store]` section
pub fn store_options(config: &Config) -> StoreOptions {
    StoreOptions {
        lock_timeout: Duration::from_millis(config.store.lock_timeout_ms),
        delete_policy: config.store.delete_policy,
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
