//! Collection run: credentials, then each configured account in turn.
//!
//! Accounts are processed strictly one after another. Per-account failures
//! are logged and isolated so one bad handle does not abort the run; only
//! configuration and credential problems are fatal.

mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tweetdump_client::{ClientError, RateLimitPolicy, XClient};
use tweetdump_core::{AppConfig, CollectionResult, PostRecord};

pub(crate) use output::OutputWriter;

/// Final state of one account after a run.
pub(crate) enum AccountOutcome {
    /// Timeline fetched to completion (end of timeline or cap).
    Done(Vec<PostRecord>),
    /// The handle does not exist.
    Skipped,
    /// Resolution or paging failed; `posts` holds whatever came back first.
    Aborted {
        posts: Vec<PostRecord>,
        error: ClientError,
    },
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub done: usize,
    pub skipped: usize,
    pub aborted: usize,
    pub posts: usize,
    pub combined_file: Option<PathBuf>,
}

/// Runs a full collection from configuration.
///
/// Credentials are bootstrapped and validated before any client is built, so
/// a missing or placeholder file stops the run with no network traffic.
///
/// # Errors
///
/// Returns an error for credential problems, an unusable output directory,
/// a client that cannot be constructed, or a failed combined-file write.
/// Per-account failures are logged and skipped, not propagated.
pub(crate) async fn run_collect(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let credentials = tweetdump_core::credentials::ensure_and_load(&config.credentials_path)?;

    let policy = RateLimitPolicy::new(
        Duration::from_secs(config.rate_limit_wait_secs),
        config.rate_limit_max_retries,
    );
    let client = XClient::with_base_url(
        &credentials.bearer_token,
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
        policy,
    )
    .context("failed to build X API client")?;
    tracing::info!("API client ready");

    let writer = OutputWriter::create(&config.output_dir)?;
    let (result, mut summary) = collect_accounts(
        &client,
        &writer,
        &config.handles,
        config.max_posts_per_account,
        Duration::from_millis(config.page_delay_ms),
    )
    .await;

    if result.is_empty() {
        tracing::info!("no posts collected; combined file will be empty");
    }
    summary.combined_file = Some(writer.write_combined(&result, chrono::Local::now())?);

    tracing::info!(
        combined_file = ?summary.combined_file,
        accounts = ?result.handles().collect::<Vec<_>>(),
        done = summary.done,
        skipped = summary.skipped,
        aborted = summary.aborted,
        posts = summary.posts,
        "execution complete"
    );
    Ok(summary)
}

/// Processes `handles` in order, writing each non-empty account file as soon
/// as that account finishes.
pub(crate) async fn collect_accounts(
    client: &XClient,
    writer: &OutputWriter,
    handles: &[String],
    max_posts: usize,
    page_delay: Duration,
) -> (CollectionResult, RunSummary) {
    let mut result = CollectionResult::new();
    let mut summary = RunSummary::default();

    for handle in handles {
        let posts = match process_account(client, handle, max_posts, page_delay).await {
            AccountOutcome::Done(posts) => {
                summary.done += 1;
                posts
            }
            AccountOutcome::Skipped => {
                summary.skipped += 1;
                continue;
            }
            AccountOutcome::Aborted { posts, error } => {
                summary.aborted += 1;
                tracing::warn!(
                    handle = %handle,
                    kept = posts.len(),
                    error = %error,
                    "account aborted; keeping partial results"
                );
                posts
            }
        };

        if posts.is_empty() {
            continue;
        }

        match writer.write_account(handle, &posts, chrono::Local::now()) {
            Ok(path) => tracing::info!(
                handle = %handle,
                posts = posts.len(),
                path = %path.display(),
                "saved account posts"
            ),
            Err(e) => tracing::error!(
                handle = %handle,
                error = %format!("{e:#}"),
                "failed to write account file; posts kept for the combined file"
            ),
        }
        result.insert(handle, posts);
    }

    summary.posts = result.total_posts();
    (result, summary)
}

/// Resolves one handle and pages through its timeline.
async fn process_account(
    client: &XClient,
    handle: &str,
    max_posts: usize,
    page_delay: Duration,
) -> AccountOutcome {
    tracing::info!(handle, "processing posts for account");

    let account_id = match client.resolve_account_id(handle).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            tracing::warn!(handle, "could not find account id; skipping");
            return AccountOutcome::Skipped;
        }
        Err(error) => {
            tracing::error!(handle, error = %error, "failed to resolve account");
            return AccountOutcome::Aborted {
                posts: Vec::new(),
                error,
            };
        }
    };

    let harvest = client
        .fetch_account_posts(account_id, max_posts, page_delay)
        .await;
    tracing::info!(
        handle,
        account_id = %account_id,
        posts = harvest.posts.len(),
        pages = harvest.pages,
        "retrieved posts"
    );

    match harvest.error {
        Some(error) => AccountOutcome::Aborted {
            posts: harvest.posts,
            error,
        },
        None => AccountOutcome::Done(harvest.posts),
    }
}

#[cfg(test)]
#[path = "collect/collect_test.rs"]
mod tests;
