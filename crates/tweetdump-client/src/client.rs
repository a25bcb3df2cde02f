//! HTTP client for the X API v2.
//!
//! Wraps `reqwest` with bearer-token auth, typed response deserialization, and
//! status-code mapping. HTTP 429 surfaces as [`ClientError::RateLimited`] so
//! callers can apply a [`RateLimitPolicy`].

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tweetdump_core::AccountId;

use crate::error::ClientError;
use crate::rate_limit::{retry_on_rate_limit, RateLimitPolicy};
use crate::types::{RawPage, UserLookupResponse};

pub use fetch_all::TimelineHarvest;

/// Largest `max_results` the timeline endpoint accepts.
pub const MAX_RESULTS_PER_PAGE: u32 = 100;

const TWEET_FIELDS: &str = "created_at,public_metrics,source,lang,context_annotations,entities";
const USER_FIELDS: &str = "name,username,description,public_metrics,verified,profile_image_url";
const EXPANSIONS: &str = "author_id,referenced_tweets.id,attachments.media_keys";
const MEDIA_FIELDS: &str = "type,url,alt_text,public_metrics";

/// Client for the X API v2.
///
/// The base URL comes from configuration, so tests point it at a mock server.
pub struct XClient {
    client: Client,
    bearer_token: String,
    base_url: Url,
    rate_limit: RateLimitPolicy,
}

impl XClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        bearer_token: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        rate_limit: RateLimitPolicy,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_owned()));
        }

        Ok(Self {
            client,
            bearer_token: bearer_token.to_owned(),
            base_url: parsed,
            rate_limit,
        })
    }

    /// Resolves a handle to its numeric account id.
    ///
    /// Returns `Ok(None)` when the platform reports that the handle does not
    /// exist. Rate-limited lookups are repeated per the client's
    /// [`RateLimitPolicy`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unauthorized`] on HTTP 401/403.
    /// - [`ClientError::Api`] if the API reports an error other than "not found".
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport failure.
    /// - [`ClientError::Deserialize`] if the body does not match the expected shape.
    pub async fn resolve_account_id(&self, handle: &str) -> Result<Option<AccountId>, ClientError> {
        retry_on_rate_limit(&self.rate_limit, || self.lookup_user(handle)).await
    }

    async fn lookup_user(&self, handle: &str) -> Result<Option<AccountId>, ClientError> {
        let url = self.endpoint(&["2", "users", "by", "username", handle]);
        let Some(body) = self.get_json::<UserLookupResponse>(url, true).await? else {
            tracing::debug!(handle, "account lookup returned HTTP 404");
            return Ok(None);
        };

        match body.data {
            Some(user) => user.id.parse::<AccountId>().map(Some).map_err(|e| {
                ClientError::Api(format!("non-numeric account id {:?}: {e}", user.id))
            }),
            None => {
                if let Some(problem) = body.errors.iter().find(|p| !p.is_not_found()) {
                    return Err(ClientError::Api(problem.message()));
                }
                tracing::debug!(handle, "account lookup reported not found");
                Ok(None)
            }
        }
    }

    /// Fetches one page (up to [`MAX_RESULTS_PER_PAGE`] posts) of an account's
    /// timeline, newest first, with the author, media, and referenced-post
    /// side tables.
    ///
    /// Makes exactly one request; a 429 is returned as
    /// [`ClientError::RateLimited`] for the caller to handle.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`] on HTTP 429.
    /// - [`ClientError::Unauthorized`] on HTTP 401/403.
    /// - [`ClientError::Api`] if the page carries only errors and no posts.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport failure.
    /// - [`ClientError::Deserialize`] if the body does not match the expected shape.
    pub async fn fetch_posts_page(
        &self,
        account_id: AccountId,
        pagination_token: Option<&str>,
    ) -> Result<RawPage, ClientError> {
        let url = self.timeline_url(account_id, pagination_token);
        let page = self
            .get_json::<RawPage>(url, false)
            .await?
            .unwrap_or_default();

        if page.data.is_empty() {
            if let Some(problem) = page.errors.first() {
                return Err(ClientError::Api(problem.message()));
            }
        }
        Ok(page)
    }

    fn timeline_url(&self, account_id: AccountId, pagination_token: Option<&str>) -> Url {
        let id = account_id.to_string();
        let mut url = self.endpoint(&["2", "users", &id, "tweets"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("max_results", &MAX_RESULTS_PER_PAGE.to_string());
            pairs.append_pair("tweet.fields", TWEET_FIELDS);
            pairs.append_pair("user.fields", USER_FIELDS);
            pairs.append_pair("expansions", EXPANSIONS);
            pairs.append_pair("media.fields", MEDIA_FIELDS);
            if let Some(token) = pagination_token {
                pairs.append_pair("pagination_token", token);
            }
        }
        url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_base_url` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends an authenticated GET and parses the JSON body.
    ///
    /// Returns `Ok(None)` for HTTP 404 when `not_found_is_none` is set.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        not_found_is_none: bool,
    ) -> Result<Option<T>, ClientError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = rate_limit_reset_in(response.headers());
            return Err(ClientError::RateLimited { retry_after_secs });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized {
                status: status.as_u16(),
                url: without_query(&url),
            });
        }

        if status == StatusCode::NOT_FOUND && not_found_is_none {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: without_query(&url),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ClientError::Deserialize {
                context: without_query(&url),
                source: e,
            })
    }
}

/// Seconds until the window named by `x-rate-limit-reset` (epoch seconds)
/// reopens, if the header is present and parseable.
fn rate_limit_reset_in(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let reset = headers
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())?;
    let now = chrono::Utc::now().timestamp();
    u64::try_from(reset.saturating_sub(now)).ok()
}

/// URL without its query string, for error messages and logs.
fn without_query(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
