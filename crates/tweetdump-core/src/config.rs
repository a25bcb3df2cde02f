use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_HANDLES: &str = "elonmusk,WhiteHouse,realDonaldTrump,POTUS,SecDef,SecRubio";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let credentials_path = PathBuf::from(or_default(
        "TWEETDUMP_CREDENTIALS_PATH",
        "twitter_credentials.json",
    ));
    let output_dir = PathBuf::from(or_default("TWEETDUMP_OUTPUT_DIR", "twitter_data"));
    let log_file = PathBuf::from(or_default("TWEETDUMP_LOG_FILE", "twitter_scraper.log"));
    let log_level = or_default("TWEETDUMP_LOG_LEVEL", "info");

    let handles = parse_handles(&or_default("TWEETDUMP_HANDLES", DEFAULT_HANDLES));
    if handles.is_empty() {
        return Err(invalid(
            "TWEETDUMP_HANDLES",
            "must list at least one account handle".to_string(),
        ));
    }

    let max_posts_per_account = or_default("TWEETDUMP_MAX_POSTS_PER_ACCOUNT", "50")
        .parse::<usize>()
        .map_err(|e| invalid("TWEETDUMP_MAX_POSTS_PER_ACCOUNT", e.to_string()))?;
    if max_posts_per_account == 0 {
        return Err(invalid(
            "TWEETDUMP_MAX_POSTS_PER_ACCOUNT",
            "must be at least 1".to_string(),
        ));
    }

    let api_base_url = or_default("TWEETDUMP_API_BASE_URL", "https://api.twitter.com");
    let request_timeout_secs = parse_u64("TWEETDUMP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TWEETDUMP_USER_AGENT", "tweetdump/0.1 (timeline-archiver)");
    let page_delay_ms = parse_u64("TWEETDUMP_PAGE_DELAY_MS", "1000")?;
    let rate_limit_wait_secs = parse_u64("TWEETDUMP_RATE_LIMIT_WAIT_SECS", "900")?;

    // Absent means "retry forever"; only parse when the operator sets a bound.
    let rate_limit_max_retries = match lookup("TWEETDUMP_RATE_LIMIT_MAX_RETRIES") {
        Ok(_) => Some(parse_u32("TWEETDUMP_RATE_LIMIT_MAX_RETRIES", "")?),
        Err(_) => None,
    };

    Ok(AppConfig {
        credentials_path,
        output_dir,
        log_file,
        log_level,
        handles,
        max_posts_per_account,
        api_base_url,
        request_timeout_secs,
        user_agent,
        page_delay_ms,
        rate_limit_wait_secs,
        rate_limit_max_retries,
    })
}

/// Split a comma-separated handle list, trimming whitespace and any leading `@`.
#[must_use]
pub fn parse_handles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().trim_start_matches('@'))
        .filter(|h| !h.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
