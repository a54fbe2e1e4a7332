//! Error handling
//!
//! Provides typed errors for every stage of a run with descriptive messages
//! and recovery suggestions. Lower layers return these; only the binary turns
//! them into a process exit.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::fetch::FetchError;

/// Errors that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// No config file at any candidate location
    #[error(
        "No config file found (looked in {}). You need to copy tootlogger.example.toml and add your settings.",
        display_paths(.searched)
    )]
    ConfigNotFound { searched: Vec<PathBuf> },

    /// Config file exists but could not be read
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML or does not match the account layout
    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be serialized back to TOML
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file could not be written
    #[error("Failed to write config file '{path}': {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fetching toots for one account failed
    #[error("Failed to fetch toots for '{account}': {source}")]
    Fetch {
        account: String,
        #[source]
        source: FetchError,
    },

    /// Handing the journal to the external tool failed
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl Error {
    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Create ./tootlogger.toml or ~/.tootlogger.toml with one table per account \
                 holding `instance` and `access_token`.",
            ),
            Error::ConfigParse { .. } => {
                Some("Each top-level table needs string `instance` and `access_token` keys and an optional integer `last_id`.")
            }
            Error::Delivery(DeliveryError::NotFound { .. }) => {
                Some("Install the Day One command line tools, or pass --journal-cli.")
            }
            Error::Fetch { .. } => {
                Some("Check the instance URL and access token. Nothing was logged, so re-running is safe.")
            }
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for tootlogger operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_lists_candidates() {
        let err = Error::ConfigNotFound {
            searched: vec![
                PathBuf::from("tootlogger.toml"),
                PathBuf::from("/home/me/.tootlogger.toml"),
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("'tootlogger.toml'"));
        assert!(msg.contains("'/home/me/.tootlogger.toml'"));
        assert!(msg.contains("copy"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_fetch_error_names_account() {
        let err = Error::Fetch {
            account: "@me@example.social".to_string(),
            source: FetchError::InvalidUrl {
                url: "not a url".to_string(),
            },
        };

        let msg = err.to_string();
        assert!(msg.contains("@me@example.social"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_write_error_has_no_suggestion() {
        let err = Error::ConfigWrite {
            path: PathBuf::from("/read/only.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert!(err.to_string().contains("/read/only.toml"));
        assert!(err.recovery_suggestion().is_none());
    }
}
