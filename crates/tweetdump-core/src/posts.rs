//! Normalized post records and the per-run collection result.
//!
//! A [`PostRecord`] has a fixed shape: every optional field is serialized as
//! `null` rather than omitted, and `entities` is always the three-key object.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Numeric platform account identifier resolved from a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(AccountId)
    }
}

/// Engagement counts for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub bookmark_count: Option<u64>,
    #[serde(default)]
    pub impression_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetrics {
    #[serde(default)]
    pub view_count: Option<u64>,
}

/// Profile summary of a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub username: String,
    pub description: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub tweet_count: u64,
    pub verified: bool,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub media_key: String,
    pub url: Option<String>,
    pub alt_text: Option<String>,
    pub metrics: Option<MediaMetrics>,
}

/// A retweet, quote, or reply pointer.
///
/// `text`, `created_at` and `public_metrics` are filled only when the target
/// post was included in the same response page, and are left out of the JSON
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedPost {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metrics: Option<PostMetrics>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub username: String,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    pub url: String,
    pub expanded_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

/// One normalized post, the unit written to the output files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub lang: Option<String>,
    pub source: Option<String>,
    pub public_metrics: Option<PostMetrics>,
    pub author: Option<AuthorSummary>,
    pub media: Option<Vec<MediaItem>>,
    pub referenced_tweets: Option<Vec<ReferencedPost>>,
    #[serde(default)]
    pub entities: Entities,
}

/// Handle → posts, in the order accounts were processed.
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionResult {
    accounts: Vec<(String, Vec<PostRecord>)>,
}

impl CollectionResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the posts for `handle`, replacing any earlier entry for it.
    pub fn insert(&mut self, handle: &str, posts: Vec<PostRecord>) {
        if let Some(slot) = self.accounts.iter_mut().find(|(h, _)| h == handle) {
            slot.1 = posts;
        } else {
            self.accounts.push((handle.to_owned(), posts));
        }
    }

    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|(h, _)| h.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    #[must_use]
    pub fn total_posts(&self) -> usize {
        self.accounts.iter().map(|(_, posts)| posts.len()).sum()
    }
}

impl Serialize for CollectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.accounts.len()))?;
        for (handle, posts) in &self.accounts {
            map.serialize_entry(handle, posts)?;
        }
        map.end()
    }
}
