//! Data models for toots
//!
//! A `RawPost` is what the Mastodon API hands back; a `CleanedPost` is what
//! ends up in the journal. Neither outlives a single run.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// A toot as returned by the instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPost {
    /// Server-assigned id, increasing over time
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,

    /// When the toot was created
    pub created_at: DateTime<FixedOffset>,

    /// HTML body
    pub content: String,
}

impl RawPost {
    pub fn new(id: u64, created_at: DateTime<FixedOffset>, content: impl Into<String>) -> Self {
        Self {
            id,
            created_at,
            content: content.into(),
        }
    }
}

/// A toot ready to render: local timestamp, plain-text body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedPost {
    pub created_at: DateTime<FixedOffset>,
    pub content: String,
}

/// Id of the newest toot in a newest-first list
pub fn latest_post_id(posts: &[RawPost]) -> Option<u64> {
    posts.first().map(|post| post.id)
}

/// Mastodon sends ids as strings; older servers and test fixtures use numbers.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(id) => Ok(id),
        Id::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_latest_post_id_is_first() {
        let posts = vec![
            RawPost::new(12345, at("2024-01-15T12:30:00Z"), "newest"),
            RawPost::new(12344, at("2024-01-15T11:30:00Z"), "older"),
            RawPost::new(12343, at("2024-01-15T10:30:00Z"), "oldest"),
        ];

        assert_eq!(latest_post_id(&posts), Some(12345));
    }

    #[test]
    fn test_latest_post_id_single_and_empty() {
        let posts = vec![RawPost::new(99999, at("2024-01-15T12:30:00Z"), "only one")];
        assert_eq!(latest_post_id(&posts), Some(99999));
        assert_eq!(latest_post_id(&[]), None);
    }

    #[test]
    fn test_deserialize_mastodon_status() {
        let json = r#"{
            "id": "109876543210",
            "created_at": "2024-01-15T12:30:00.000Z",
            "content": "<p>Hello</p>",
            "visibility": "public"
        }"#;

        let post: RawPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 109876543210);
        assert_eq!(post.created_at, at("2024-01-15T12:30:00Z"));
        assert_eq!(post.content, "<p>Hello</p>");
    }

    #[test]
    fn test_deserialize_numeric_id() {
        let json = r#"{"id": 42, "created_at": "2024-01-15T12:30:00+02:00", "content": ""}"#;

        let post: RawPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 42);
    }

    #[test]
    fn test_deserialize_rejects_bad_id() {
        let json = r#"{"id": "abc", "created_at": "2024-01-15T12:30:00Z", "content": ""}"#;
        assert!(serde_json::from_str::<RawPost>(json).is_err());
    }
}
