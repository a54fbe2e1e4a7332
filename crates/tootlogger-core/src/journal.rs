//! Journal formatting
//!
//! Turns fetched toots into the single text entry handed to Day One.

use std::fmt::Write;

use chrono::TimeZone;
use indexmap::IndexMap;

use crate::html;
use crate::models::{CleanedPost, RawPost};

/// First line of every journal entry
pub const JOURNAL_HEADER: &str = "The day's toots!";

/// Shown for an account with nothing new
pub const NO_TOOTS: &str = "No toots for this account!";

/// Marker introducing each toot
pub const TOOT_MARKER: &str = "I tooted;";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Prepare a raw toot for rendering
///
/// The timestamp is moved into `zone` when one is given and left in its
/// original offset otherwise.
pub fn clean<Tz: TimeZone>(post: &RawPost, zone: Option<&Tz>) -> CleanedPost {
    let created_at = match zone {
        Some(zone) => post.created_at.with_timezone(zone).fixed_offset(),
        None => post.created_at,
    };

    CleanedPost {
        created_at,
        content: html::to_text(&post.content),
    }
}

/// Clean every account's toots, keeping account and toot order
pub fn clean_all<Tz: TimeZone>(
    fetched: &IndexMap<String, Vec<RawPost>>,
    zone: Option<&Tz>,
) -> IndexMap<String, Vec<CleanedPost>> {
    fetched
        .iter()
        .map(|(name, posts)| {
            let cleaned = posts.iter().map(|post| clean(post, zone)).collect();
            (name.clone(), cleaned)
        })
        .collect()
}

/// Render the journal entry
///
/// One section per account in map order; toots stay in the order given.
pub fn render(accounts: &IndexMap<String, Vec<CleanedPost>>) -> String {
    let mut doc = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(doc, "# {}", JOURNAL_HEADER);

    for (name, posts) in accounts {
        let _ = writeln!(doc);
        let _ = writeln!(doc, "## {}", name);
        let _ = writeln!(doc);

        if posts.is_empty() {
            let _ = writeln!(doc, "{}", NO_TOOTS);
            continue;
        }

        for (i, post) in posts.iter().enumerate() {
            if i > 0 {
                let _ = writeln!(doc);
            }
            let _ = writeln!(
                doc,
                "**{} at {}**",
                TOOT_MARKER,
                post.created_at.format(TIMESTAMP_FORMAT)
            );
            let _ = writeln!(doc);
            doc.push_str(&post.content);
            if !post.content.ends_with('\n') {
                doc.push('\n');
            }
        }
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn cleaned(time: &str, content: &str) -> CleanedPost {
        CleanedPost {
            created_at: at(time),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_clean_converts_html() {
        let post = RawPost::new(
            12345,
            at("2024-01-15T12:30:00Z"),
            "<p>Hello <strong>world</strong>!</p>",
        );

        let result = clean(&post, Some(&Utc));
        assert_eq!(result.content, "Hello **world**!\n");
        assert_eq!(result.created_at, at("2024-01-15T12:30:00Z"));
    }

    #[test]
    fn test_clean_converts_timezone() {
        let post = RawPost::new(1, at("2024-01-15T12:30:00Z"), "<p>Test</p>");
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        let result = clean(&post, Some(&tokyo));
        assert_eq!(result.created_at.offset(), &tokyo);
        assert_eq!(result.created_at.to_rfc3339(), "2024-01-15T21:30:00+09:00");
        // Same instant, different wall clock
        assert_eq!(result.created_at, post.created_at);
    }

    #[test]
    fn test_clean_without_zone_keeps_offset() {
        let post = RawPost::new(1, at("2024-01-15T12:30:00-05:00"), "<p>Test</p>");

        let result = clean::<Utc>(&post, None);
        assert_eq!(result.created_at.to_rfc3339(), "2024-01-15T12:30:00-05:00");
    }

    #[test]
    fn test_render_empty_account() {
        let mut accounts = IndexMap::new();
        accounts.insert("@user@instance.social".to_string(), Vec::new());

        let doc = render(&accounts);
        assert!(doc.contains(JOURNAL_HEADER));
        assert!(doc.contains("## @user@instance.social"));
        assert!(doc.contains(NO_TOOTS));
        assert!(!doc.contains(TOOT_MARKER));
    }

    #[test]
    fn test_render_exact_layout() {
        let mut accounts = IndexMap::new();
        accounts.insert(
            "@user@instance.social".to_string(),
            vec![
                cleaned("2024-01-15T13:00:00Z", "Second\n"),
                cleaned("2024-01-15T12:30:00Z", "Hello **world**!\n"),
            ],
        );
        accounts.insert("quiet".to_string(), Vec::new());

        let expected = "\
# The day's toots!

## @user@instance.social

**I tooted; at 2024-01-15 13:00:00 +00:00**

Second

**I tooted; at 2024-01-15 12:30:00 +00:00**

Hello **world**!

## quiet

No toots for this account!
";
        assert_eq!(render(&accounts), expected);
    }

    #[test]
    fn test_render_keeps_account_order() {
        let mut accounts = IndexMap::new();
        accounts.insert(
            "@zed@other.social".to_string(),
            vec![cleaned("2024-01-15T13:00:00Z", "Second account\n")],
        );
        accounts.insert(
            "@amy@instance.social".to_string(),
            vec![cleaned("2024-01-15T12:30:00Z", "First account\n")],
        );

        let doc = render(&accounts);
        let zed = doc.find("@zed@other.social").unwrap();
        let amy = doc.find("@amy@instance.social").unwrap();
        assert!(zed < amy);
        assert!(doc.contains("First account"));
        assert!(doc.contains("Second account"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut accounts = IndexMap::new();
        accounts.insert(
            "me".to_string(),
            vec![cleaned("2024-01-15T12:30:00+02:00", "Hello\n")],
        );

        assert_eq!(render(&accounts), render(&accounts.clone()));
    }

    #[test]
    fn test_clean_all_preserves_order() {
        let mut fetched = IndexMap::new();
        fetched.insert(
            "b".to_string(),
            vec![
                RawPost::new(2, at("2024-01-15T13:00:00Z"), "<p>new</p>"),
                RawPost::new(1, at("2024-01-15T12:00:00Z"), "<p>old</p>"),
            ],
        );
        fetched.insert("a".to_string(), Vec::new());

        let cleaned = clean_all(&fetched, Some(&Utc));
        let names: Vec<_> = cleaned.keys().cloned().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(cleaned["b"][0].content, "new\n");
        assert_eq!(cleaned["b"][1].content, "old\n");
        assert!(cleaned["a"].is_empty());
    }
}
