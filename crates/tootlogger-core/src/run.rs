//! Run orchestration
//!
//! One run walks a fixed sequence: check the journal tool, fetch every
//! account, render a single entry, deliver it, then advance watermarks and
//! save the config. Any failure stops the run before the config is touched,
//! so the next run fetches and delivers the same toots again.

use chrono::TimeZone;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ConfigResult;
use crate::delivery::JournalSink;
use crate::error::{Error, Result};
use crate::fetch::TootSource;
use crate::journal;
use crate::models::{latest_post_id, RawPost};

/// Knobs for a single run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Render only: no tool check, no delivery, no config write
    pub dry_run: bool,
}

/// What happened to one account during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountReport {
    pub name: String,
    pub fetched: usize,
    /// Watermark after the run (unchanged if nothing was fetched)
    pub last_id: Option<u64>,
}

/// Result of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub document: String,
    pub accounts: Vec<AccountReport>,
    pub delivered: bool,
}

impl RunReport {
    /// Total toots across all accounts
    pub fn total_fetched(&self) -> usize {
        self.accounts.iter().map(|a| a.fetched).sum()
    }
}

/// Execute one run against a loaded config
///
/// `zone` is the local time zone used for timestamps; `None` keeps the
/// offsets the server sent.
pub fn run_once<S, J, Tz>(
    mut loaded: ConfigResult,
    source: &S,
    sink: &J,
    zone: Option<&Tz>,
    options: RunOptions,
) -> Result<RunReport>
where
    S: TootSource + ?Sized,
    J: JournalSink + ?Sized,
    Tz: TimeZone,
{
    if !options.dry_run {
        sink.check_available()?;
    }

    let fetched = fetch_all(&loaded, source)?;
    let document = journal::render(&journal::clean_all(&fetched, zone));

    if options.dry_run {
        info!("Dry run: not delivering or saving");
        let accounts = fetched
            .iter()
            .map(|(name, posts)| AccountReport {
                name: name.clone(),
                fetched: posts.len(),
                last_id: loaded.config.get(name).and_then(|a| a.last_id),
            })
            .collect();
        return Ok(RunReport {
            document,
            accounts,
            delivered: false,
        });
    }

    sink.deliver(&document)?;
    info!("Journal delivered");

    let accounts = advance_watermarks(&mut loaded, &fetched);
    loaded.save()?;
    info!("Saved watermarks to {:?}", loaded.path);

    Ok(RunReport {
        document,
        accounts,
        delivered: true,
    })
}

/// Fetch every account in config order, stopping at the first failure
fn fetch_all<S>(loaded: &ConfigResult, source: &S) -> Result<IndexMap<String, Vec<RawPost>>>
where
    S: TootSource + ?Sized,
{
    let mut fetched = IndexMap::with_capacity(loaded.config.len());
    for (name, account) in loaded.config.iter() {
        debug!("Fetching {} since {:?}", name, account.last_id);
        let posts = source.fetch(account).map_err(|err| Error::Fetch {
            account: name.clone(),
            source: err,
        })?;
        info!("{}: {} new toot(s)", name, posts.len());
        fetched.insert(name.clone(), posts);
    }
    Ok(fetched)
}

/// Move each account's watermark to its newest fetched toot
fn advance_watermarks(
    loaded: &mut ConfigResult,
    fetched: &IndexMap<String, Vec<RawPost>>,
) -> Vec<AccountReport> {
    fetched
        .iter()
        .map(|(name, posts)| {
            let fetched = posts.len();
            let last_id = match loaded.config.get_mut(name) {
                Some(account) => {
                    if let Some(newest) = latest_post_id(posts) {
                        if !account.advance_watermark(newest) {
                            warn!(
                                "{}: newest toot {} is older than watermark {:?}, keeping watermark",
                                name, newest, account.last_id
                            );
                        }
                    }
                    account.last_id
                }
                None => None,
            };
            AccountReport {
                name: name.clone(),
                fetched,
                last_id,
            }
        })
        .collect()
}
