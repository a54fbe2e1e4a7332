//! Mastodon API client
//!
//! Fetches the authenticated account's own toots that are newer than the
//! account's watermark. Requests are blocking and are never retried.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AccountConfig;
use crate::models::{deserialize_id, RawPost};

/// Largest page size Mastodon accepts for account statuses
const MAX_PAGE_LIMIT: u32 = 40;

/// Errors from talking to a Mastodon instance
#[derive(Error, Debug)]
pub enum FetchError {
    /// The configured instance is not a usable base URL
    #[error("Invalid instance URL '{url}'")]
    InvalidUrl { url: String },

    /// The instance answered with a non-success status
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// Paging hit `max_pages` while full pages were still coming
    #[error("More toots remain after {pages} page(s); raise the page limit or fetch again later")]
    Truncated { pages: usize },

    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Something that can list an account's new toots
///
/// The run orchestrator only talks to this trait, so tests can stand in for a
/// real instance.
pub trait TootSource {
    /// Toots newer than `account.last_id`, newest first
    fn fetch(&self, account: &AccountConfig) -> Result<Vec<RawPost>, FetchError>;
}

/// Tuning for the HTTP client
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Toots requested per page (capped at 40)
    pub page_limit: u32,
    /// Give up with `FetchError::Truncated` after this many full pages;
    /// `None` pages until the instance runs out of toots
    pub max_pages: Option<usize>,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_limit: MAX_PAGE_LIMIT,
            max_pages: None,
            timeout: None,
            user_agent: format!("tootlogger/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CredentialAccount {
    #[serde(deserialize_with = "deserialize_id")]
    id: u64,
    #[serde(default)]
    acct: String,
}

/// Blocking client for the Mastodon REST API
pub struct MastodonClient {
    client: Client,
    settings: FetchSettings,
}

impl MastodonClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client, settings })
    }

    /// Look up the id of the account the token belongs to
    fn verify_credentials(&self, base: &str, token: &str) -> Result<CredentialAccount, FetchError> {
        let url = format!("{}/api/v1/accounts/verify_credentials", base);
        let response = self.client.get(&url).bearer_auth(token).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        Ok(response.json()?)
    }

    /// One page of the account's statuses
    fn statuses_page(
        &self,
        base: &str,
        token: &str,
        account_id: u64,
        since_id: Option<u64>,
        max_id: Option<u64>,
    ) -> Result<Vec<RawPost>, FetchError> {
        let url = format!("{}/api/v1/accounts/{}/statuses", base, account_id);

        let mut query = vec![("limit", self.page_limit().to_string())];
        if let Some(since_id) = since_id {
            query.push(("since_id", since_id.to_string()));
        }
        if let Some(max_id) = max_id {
            query.push(("max_id", max_id.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        Ok(response.json()?)
    }

    fn page_limit(&self) -> u32 {
        self.settings.page_limit.clamp(1, MAX_PAGE_LIMIT)
    }
}

impl TootSource for MastodonClient {
    fn fetch(&self, account: &AccountConfig) -> Result<Vec<RawPost>, FetchError> {
        let base = normalize_instance(&account.instance)?;
        let me = self.verify_credentials(&base, &account.access_token)?;
        debug!("Authenticated as {} (id {}) on {}", me.acct, me.id, base);

        let mut posts: Vec<RawPost> = Vec::new();
        let mut max_id = None;
        let mut pages = 0;

        loop {
            if let Some(limit) = self.settings.max_pages {
                if pages >= limit {
                    warn!(
                        "{}: more toots remain after {} page(s), not advancing past them",
                        base, pages
                    );
                    return Err(FetchError::Truncated { pages });
                }
            }

            let batch = self.statuses_page(
                &base,
                &account.access_token,
                me.id,
                account.last_id,
                max_id,
            )?;
            pages += 1;
            let batch_len = batch.len();
            debug!("Page {} from {}: {} toot(s)", pages, base, batch_len);

            max_id = batch.iter().map(|post| post.id).min();
            posts.extend(batch);

            // A short page is the last one.
            if batch_len < self.page_limit() as usize || max_id.is_none() {
                break;
            }
        }

        info!("Fetched {} new toot(s) from {}", posts.len(), base);
        Ok(posts)
    }
}

/// Trim trailing slashes and require an http(s) scheme
fn normalize_instance(instance: &str) -> Result<String, FetchError> {
    let trimmed = instance.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .map(|rest| !rest.is_empty())
        .unwrap_or(false);

    if has_host {
        Ok(trimmed.to_string())
    } else {
        Err(FetchError::InvalidUrl {
            url: instance.to_string(),
        })
    }
}
