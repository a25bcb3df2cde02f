//! Normalization from raw timeline pages to [`tweetdump_core::PostRecord`].
//!
//! Side tables (`includes.users`, `includes.media`, `includes.tweets`) are
//! indexed once per page and joined onto each post. Missing side data is
//! never an error; only a post without its own id, text, or timestamp is
//! rejected.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tweetdump_core::{
    AuthorSummary, Entities, MediaItem, Mention, PostRecord, ReferencedPost, UrlEntity,
};

use crate::error::ClientError;
use crate::types::{RawEntities, RawMedia, RawPage, RawPost, RawUser};

/// Id/key indexes over a page's side tables.
struct Lookups<'a> {
    users: HashMap<&'a str, &'a RawUser>,
    media: HashMap<&'a str, &'a RawMedia>,
    posts: HashMap<&'a str, &'a RawPost>,
}

impl<'a> Lookups<'a> {
    fn from_page(page: &'a RawPage) -> Self {
        Self {
            users: page
                .includes
                .users
                .iter()
                .map(|u| (u.id.as_str(), u))
                .collect(),
            media: page
                .includes
                .media
                .iter()
                .map(|m| (m.media_key.as_str(), m))
                .collect(),
            posts: page
                .includes
                .tweets
                .iter()
                .filter_map(|t| t.id.as_deref().map(|id| (id, t)))
                .collect(),
        }
    }
}

/// Normalizes every post in `page`, preserving API order.
///
/// Posts that fail [`normalize_post`] are dropped and logged at warn level.
#[must_use]
pub fn normalize_page(page: &RawPage) -> Vec<PostRecord> {
    let lookups = Lookups::from_page(page);
    page.data
        .iter()
        .filter_map(|post| match normalize_post(post, &lookups) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed post");
                None
            }
        })
        .collect()
}

/// Builds one [`PostRecord`] from a raw post and the page's side tables.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the post has no `id`, no `text`,
/// or a missing/unparseable `created_at`.
fn normalize_post(post: &RawPost, lookups: &Lookups<'_>) -> Result<PostRecord, ClientError> {
    let Some(id) = post.id.clone() else {
        return Err(ClientError::Normalization {
            post_id: "<unknown>".to_owned(),
            reason: "post has no id".into(),
        });
    };

    let Some(text) = post.text.clone() else {
        return Err(ClientError::Normalization {
            post_id: id,
            reason: "post has no text".into(),
        });
    };

    let created_at = match post.created_at.as_deref().map(parse_timestamp) {
        Some(Ok(ts)) => ts,
        Some(Err(e)) => {
            return Err(ClientError::Normalization {
                post_id: id,
                reason: format!("unparseable created_at: {e}"),
            })
        }
        None => {
            return Err(ClientError::Normalization {
                post_id: id,
                reason: "post has no created_at".into(),
            })
        }
    };

    let author = post
        .author_id
        .as_deref()
        .and_then(|author_id| lookups.users.get(author_id))
        .map(|user| author_summary(user));

    Ok(PostRecord {
        id,
        text,
        created_at,
        lang: post.lang.clone(),
        source: post.source.clone(),
        public_metrics: post.public_metrics.clone(),
        author,
        media: resolve_media(post, lookups),
        referenced_tweets: resolve_references(post, lookups),
        entities: extract_entities(post.entities.as_ref()),
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

fn author_summary(user: &RawUser) -> AuthorSummary {
    let metrics = user.public_metrics.clone().unwrap_or_default();
    AuthorSummary {
        id: user.id.clone(),
        name: user.name.clone(),
        username: user.username.clone(),
        description: user.description.clone().unwrap_or_default(),
        followers_count: metrics.followers_count,
        following_count: metrics.following_count,
        tweet_count: metrics.tweet_count,
        verified: user.verified.unwrap_or(false),
        profile_image_url: user.profile_image_url.clone(),
    }
}

/// Media in attachment order; unknown keys are skipped. `None` when nothing
/// resolved, since the raw data cannot tell "no media" from "unresolved".
fn resolve_media(post: &RawPost, lookups: &Lookups<'_>) -> Option<Vec<MediaItem>> {
    let keys = post.attachments.as_ref().map(|a| a.media_keys.as_slice())?;
    let items: Vec<MediaItem> = keys
        .iter()
        .filter_map(|key| lookups.media.get(key.as_str()))
        .map(|m| MediaItem {
            kind: m.kind.clone(),
            media_key: m.media_key.clone(),
            url: m.url.clone(),
            alt_text: m.alt_text.clone(),
            metrics: m.public_metrics.clone(),
        })
        .collect();
    (!items.is_empty()).then_some(items)
}

/// One record per reference, enriched from `includes.tweets` when the target
/// is present there.
fn resolve_references(post: &RawPost, lookups: &Lookups<'_>) -> Option<Vec<ReferencedPost>> {
    let refs = post.referenced_tweets.as_ref()?;
    let records: Vec<ReferencedPost> = refs
        .iter()
        .map(|r| {
            let target = lookups.posts.get(r.id.as_str());
            ReferencedPost {
                kind: r.kind.clone(),
                id: r.id.clone(),
                text: target.and_then(|t| t.text.clone()),
                created_at: target
                    .and_then(|t| t.created_at.as_deref())
                    .and_then(|raw| parse_timestamp(raw).ok()),
                public_metrics: target.and_then(|t| t.public_metrics.clone()),
            }
        })
        .collect();
    (!records.is_empty()).then_some(records)
}

fn extract_entities(raw: Option<&RawEntities>) -> Entities {
    let Some(raw) = raw else {
        return Entities::default();
    };
    Entities {
        hashtags: raw.hashtags.iter().map(|h| h.tag.clone()).collect(),
        mentions: raw
            .mentions
            .iter()
            .map(|m| Mention {
                username: m.username.clone(),
                id: m.id.clone(),
            })
            .collect(),
        urls: raw
            .urls
            .iter()
            .map(|u| UrlEntity {
                url: u.url.clone(),
                expanded_url: u.expanded_url.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
