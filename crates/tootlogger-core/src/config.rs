//! Account configuration
//!
//! The config file is a TOML document whose top-level tables are account
//! names:
//!
//! ```toml
//! ["@me@mastodon.social"]
//! instance = "https://mastodon.social"
//! access_token = "..."
//! last_id = 111222333444
//! ```
//!
//! The file is located from (highest to lowest precedence):
//! 1. An explicit path (`--config` or the TOOTLOGGER_CONFIG environment variable)
//! 2. `./tootlogger.toml` in the working directory
//! 3. `~/.tootlogger.toml`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable prefix
const ENV_PREFIX: &str = "TOOTLOGGER";

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "tootlogger.toml";

/// Settings for one Mastodon account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Base URL of the instance, e.g. `https://mastodon.social`
    pub instance: String,

    /// OAuth access token for the account
    pub access_token: String,

    /// Id of the newest toot already logged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_id: Option<u64>,
}

impl AccountConfig {
    pub fn new(instance: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            access_token: access_token.into(),
            last_id: None,
        }
    }

    /// Move the watermark forward to `id`
    ///
    /// Returns false (and leaves the watermark alone) if `id` would move it
    /// backwards.
    pub fn advance_watermark(&mut self, id: u64) -> bool {
        match self.last_id {
            Some(current) if id < current => false,
            _ => {
                self.last_id = Some(id);
                true
            }
        }
    }
}

/// All configured accounts, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub accounts: IndexMap<String, AccountConfig>,
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize the full configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn get(&self, name: &str) -> Option<&AccountConfig> {
        self.accounts.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AccountConfig> {
        self.accounts.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AccountConfig)> {
        self.accounts.iter()
    }

    pub fn insert(&mut self, name: impl Into<String>, account: AccountConfig) {
        self.accounts.insert(name.into(), account);
    }
}

/// A loaded config together with the file it came from
///
/// Saving goes back to `path`, so the run always writes the file it read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResult {
    pub config: Config,
    pub path: PathBuf,
}

impl ConfigResult {
    /// Resolve the config location and load it
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = resolve_path(explicit)?;
        load(&path)
    }

    /// Write the config back to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        save(&self.config, &self.path)
    }
}

/// Find the config file for this run
///
/// An explicit path (argument, then TOOTLOGGER_CONFIG) wins over discovery
/// but must exist.
pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let explicit = explicit.map(Path::to_path_buf).or_else(env_override);
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path);
        }
        return Err(Error::ConfigNotFound {
            searched: vec![path],
        });
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_path_in(&cwd, dirs::home_dir().as_deref())
}

/// Discovery against an explicit working directory and home directory
pub fn resolve_path_in(cwd: &Path, home: Option<&Path>) -> Result<PathBuf> {
    let mut searched = Vec::with_capacity(2);

    let local = cwd.join(CONFIG_FILE);
    if local.is_file() {
        debug!("Using config file {:?}", local);
        return Ok(local);
    }
    searched.push(local);

    if let Some(home) = home {
        let fallback = home.join(format!(".{}", CONFIG_FILE));
        if fallback.is_file() {
            debug!("Using config file {:?}", fallback);
            return Ok(fallback);
        }
        searched.push(fallback);
    }

    Err(Error::ConfigNotFound { searched })
}

/// Load the config at `path`
pub fn load(path: &Path) -> Result<ConfigResult> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => Error::ConfigNotFound {
            searched: vec![path.to_path_buf()],
        },
        _ => Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let config = Config::from_toml(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded {} account(s) from {:?}", config.len(), path);
    Ok(ConfigResult {
        config,
        path: path.to_path_buf(),
    })
}

/// Overwrite `path` with the full config
pub fn save(config: &Config, path: &Path) -> Result<()> {
    let content = config.to_toml()?;
    std::fs::write(path, content).map_err(|source| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Saved config to {:?}", path);
    Ok(())
}

fn env_override() -> Option<PathBuf> {
    match std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
        Ok(val) if !val.is_empty() => Some(PathBuf::from(val)),
        _ => None,
    }
}
