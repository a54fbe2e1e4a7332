//! tootlogger core library
//!
//! Fetches your own toots from one or more Mastodon accounts, renders them
//! into a single journal entry and hands it to Day One.
//!
//! # Pipeline
//!
//! ```text
//! config -> fetch (per account) -> clean -> render -> deliver -> save watermarks
//! ```
//!
//! Watermarks (`last_id`) are only written after the journal tool accepted
//! the entry, so a failed run can simply be repeated.
//!
//! # Modules
//!
//! - `config`: Account registry, discovery and persistence
//! - `fetch`: Mastodon API client
//! - `html`: HTML to readable text
//! - `journal`: Cleaning and rendering the journal entry
//! - `delivery`: Day One command line integration
//! - `run`: The run orchestrator
//! - `error`: Error types

pub mod config;
pub mod delivery;
pub mod error;
pub mod fetch;
pub mod html;
pub mod journal;
pub mod models;
pub mod run;

pub use config::{AccountConfig, Config, ConfigResult};
pub use delivery::{DayOne, DeliveryError, JournalSink};
pub use error::{Error, Result};
pub use fetch::{FetchError, FetchSettings, MastodonClient, TootSource};
pub use models::{CleanedPost, RawPost};
pub use run::{run_once, AccountReport, RunOptions, RunReport};
