use std::path::PathBuf;

/// Runtime settings for a collection run.
///
/// Secrets are not part of this struct; they live in the credentials file
/// (see [`crate::credentials`]).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub handles: Vec<String>,
    pub max_posts_per_account: usize,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Courtesy pause between successive page requests for one account.
    pub page_delay_ms: u64,
    /// Fixed wait after the API signals a rate limit.
    pub rate_limit_wait_secs: u64,
    /// `None` retries a rate-limited request indefinitely.
    pub rate_limit_max_retries: Option<u32>,
}
