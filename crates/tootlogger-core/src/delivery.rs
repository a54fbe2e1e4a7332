//! Journal delivery
//!
//! Hands the rendered entry to the Day One command line tool
//! (`dayone2 new`, entry text on stdin).

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, info};

/// Default journaling program looked up on PATH
pub const DAYONE_CLI: &str = "dayone2";

/// Subcommand that creates an entry from stdin
pub const DAYONE_COMMAND: &str = "new";

/// Errors from handing the journal to the external tool
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Program is not installed or not on PATH
    #[error("Journal tool '{program}' is not present. Please install it.")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    /// Program could not be started
    #[error("Failed to run journal tool '{}': {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Entry could not be written to the program's stdin
    #[error("Failed to send journal to '{}': {source}", .path.display())]
    Stdin {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Program ran but reported failure
    #[error("Journal tool '{}' failed with {status}", .path.display())]
    Failed { path: PathBuf, status: ExitStatus },
}

/// Somewhere a finished journal entry can go
pub trait JournalSink {
    /// Fail early if delivery cannot possibly work
    fn check_available(&self) -> Result<(), DeliveryError>;

    /// Store `document` as a new entry
    fn deliver(&self, document: &str) -> Result<(), DeliveryError>;
}

/// Day One's `dayone2` command line tool
#[derive(Debug, Clone)]
pub struct DayOne {
    program: OsString,
    args: Vec<OsString>,
    search_path: Option<OsString>,
}

impl Default for DayOne {
    fn default() -> Self {
        Self::new()
    }
}

impl DayOne {
    /// `dayone2 new`, resolved on PATH
    pub fn new() -> Self {
        Self::with_program(DAYONE_CLI)
    }

    /// Use a different program name or path, still invoked with `new`
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: vec![OsString::from(DAYONE_COMMAND)],
            search_path: None,
        }
    }

    /// Replace the arguments passed to the program
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the program against `paths` instead of the PATH variable
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    /// Absolute path of the program
    pub fn resolve(&self) -> Result<PathBuf, DeliveryError> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(&self.program, Some(paths), cwd)
            }
            None => which::which(&self.program),
        };

        found.map_err(|source| DeliveryError::NotFound {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })
    }

    fn run(&self, path: &Path, document: &str) -> Result<(), DeliveryError> {
        let mut child = Command::new(path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| DeliveryError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(document.as_bytes())
                .map_err(|source| DeliveryError::Stdin {
                    path: path.to_path_buf(),
                    source,
                })?;
            // Dropping stdin closes the pipe so the tool sees EOF.
        }

        let status = child.wait().map_err(|source| DeliveryError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

        if !status.success() {
            return Err(DeliveryError::Failed {
                path: path.to_path_buf(),
                status,
            });
        }
        Ok(())
    }
}

impl JournalSink for DayOne {
    fn check_available(&self) -> Result<(), DeliveryError> {
        let path = self.resolve()?;
        debug!("Journal tool found at {:?}", path);
        Ok(())
    }

    fn deliver(&self, document: &str) -> Result<(), DeliveryError> {
        let path = self.resolve()?;
        info!("Sending {} byte journal to {:?}", document.len(), path);
        self.run(&path, document)
    }
}
