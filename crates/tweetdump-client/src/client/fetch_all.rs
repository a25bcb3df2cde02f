//! Multi-page timeline fetch loop for `XClient`.

use std::time::Duration;

use tweetdump_core::{AccountId, PostRecord};

use crate::error::ClientError;
use crate::normalize::normalize_page;
use crate::rate_limit::retry_on_rate_limit;

use super::XClient;

/// Posts collected for one account, plus the error that cut the loop short
/// if there was one.
#[derive(Debug, Default)]
pub struct TimelineHarvest {
    /// Normalized posts in fetch order (newest first).
    pub posts: Vec<PostRecord>,
    /// Pages successfully fetched. Rate-limited attempts are not counted.
    pub pages: usize,
    /// Set when a non-rate-limit error aborted the loop. `posts` still holds
    /// everything gathered before it.
    pub error: Option<ClientError>,
}

impl TimelineHarvest {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }
}

impl XClient {
    /// Fetches up to `max_posts` posts from an account's timeline.
    ///
    /// Follows `next_token` cursors until a page comes back empty, the cap is
    /// reached (the result is truncated to exactly `max_posts`), or no further
    /// cursor is returned. `page_delay` is slept between successful pages.
    ///
    /// Rate-limited requests are repeated with the same cursor according to
    /// the client's [`crate::RateLimitPolicy`]. Any other error stops the loop
    /// and is returned in [`TimelineHarvest::error`] alongside the posts
    /// gathered so far.
    pub async fn fetch_account_posts(
        &self,
        account_id: AccountId,
        max_posts: usize,
        page_delay: Duration,
    ) -> TimelineHarvest {
        let mut harvest = TimelineHarvest::default();
        let mut cursor: Option<String> = None;

        if max_posts == 0 {
            return harvest;
        }

        loop {
            let result = retry_on_rate_limit(&self.rate_limit, || {
                self.fetch_posts_page(account_id, cursor.as_deref())
            })
            .await;

            let page = match result {
                Ok(page) => page,
                Err(err) => {
                    tracing::error!(
                        account_id = %account_id,
                        pages = harvest.pages,
                        collected = harvest.posts.len(),
                        error = %err,
                        "error fetching posts; keeping what was collected"
                    );
                    harvest.error = Some(err);
                    break;
                }
            };
            harvest.pages += 1;

            if page.data.is_empty() {
                break;
            }

            let next_token = page.meta.next_token.clone();
            harvest.posts.extend(normalize_page(&page));

            if harvest.posts.len() >= max_posts {
                harvest.posts.truncate(max_posts);
                break;
            }

            match next_token {
                Some(token) => cursor = Some(token),
                None => break,
            }

            tracing::debug!(
                account_id = %account_id,
                pages = harvest.pages,
                collected = harvest.posts.len(),
                "fetched page"
            );
            if !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }
        }

        harvest
    }
}
