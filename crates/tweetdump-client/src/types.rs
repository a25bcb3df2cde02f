//! X API v2 response types.
//!
//! Every field the API may leave out is typed as `Option` or defaulted, so
//! the normalizer never probes for presence at runtime. Mandatory post fields
//! (`id`, `text`, `created_at`) are optional here too: a post missing one of
//! them is dropped by the normalizer instead of failing the whole page.

use serde::Deserialize;
use tweetdump_core::{MediaMetrics, PostMetrics};

/// One problem object from the API's `errors` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ApiProblem {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.ends_with("/resource-not-found"))
            || self.title.as_deref() == Some("Not Found Error")
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "unknown error".to_owned())
    }
}

// ---------------------------------------------------------------------------
// GET /2/users/by/username/:username
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UserLookupResponse {
    #[serde(default)]
    pub data: Option<RawUser>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

// ---------------------------------------------------------------------------
// GET /2/users/:id/tweets
// ---------------------------------------------------------------------------

/// One page of a user's timeline plus its side tables.
#[derive(Debug, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub data: Vec<RawPost>,
    #[serde(default)]
    pub includes: RawIncludes,
    #[serde(default)]
    pub meta: RawMeta,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

/// Side tables referenced by id/key from the posts in [`RawPage::data`].
#[derive(Debug, Default, Deserialize)]
pub struct RawIncludes {
    #[serde(default)]
    pub users: Vec<RawUser>,
    #[serde(default)]
    pub media: Vec<RawMedia>,
    #[serde(default)]
    pub tweets: Vec<RawPost>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMeta {
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub newest_id: Option<String>,
    #[serde(default)]
    pub oldest_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// RFC 3339 timestamp, e.g. `2025-03-01T12:00:00.000Z`.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<PostMetrics>,
    #[serde(default)]
    pub attachments: Option<RawAttachments>,
    #[serde(default)]
    pub referenced_tweets: Option<Vec<RawReference>>,
    #[serde(default)]
    pub entities: Option<RawEntities>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAttachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReference {
    /// `retweeted`, `quoted`, or `replied_to`.
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntities {
    #[serde(default)]
    pub hashtags: Vec<RawHashtag>,
    #[serde(default)]
    pub mentions: Vec<RawMention>,
    #[serde(default)]
    pub urls: Vec<RawUrl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHashtag {
    pub tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMention {
    pub username: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUrl {
    pub url: String,
    #[serde(default)]
    pub expanded_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<RawUserMetrics>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    pub media_key: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<MediaMetrics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timeline_page_deserializes() {
        let page: RawPage = serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(page.data.is_empty());
        assert!(page.includes.users.is_empty());
        assert!(page.meta.next_token.is_none());
    }

    #[test]
    fn not_found_problem_is_detected_by_type() {
        let problem: ApiProblem = serde_json::from_value(serde_json::json!({
            "title": "Not Found Error",
            "detail": "Could not find user with username: [nobody].",
            "type": "https://api.twitter.com/2/problems/resource-not-found"
        }))
        .unwrap();
        assert!(problem.is_not_found());
        assert_eq!(
            problem.message(),
            "Could not find user with username: [nobody]."
        );
    }

    #[test]
    fn other_problem_is_not_not_found() {
        let problem = ApiProblem {
            title: Some("Forbidden".to_owned()),
            detail: None,
            kind: Some("https://api.twitter.com/2/problems/not-authorized-for-resource".to_owned()),
        };
        assert!(!problem.is_not_found());
        assert_eq!(problem.message(), "Forbidden");
    }
}
