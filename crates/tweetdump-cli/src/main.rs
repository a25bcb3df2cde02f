use clap::{Parser, Subcommand};

mod collect;
mod logging;

#[derive(Debug, Parser)]
#[command(name = "tweetdump")]
#[command(about = "Archive X account timelines to JSON files")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch posts for the configured accounts (the default command)
    Collect {
        /// Account handle to collect; repeat to collect several.
        /// Overrides `TWEETDUMP_HANDLES`.
        #[arg(long = "handle", value_name = "HANDLE")]
        handles: Vec<String>,
        /// Maximum posts kept per account. Overrides `TWEETDUMP_MAX_POSTS_PER_ACCOUNT`.
        #[arg(long)]
        max_per_account: Option<usize>,
        /// Print the accounts that would be collected and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Create or validate the credentials file without calling the API
    Credentials,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match tweetdump_core::load_app_config() {
        Ok(config) => config,
        Err(err) => {
            logging::init_console();
            return Err(report_config_error(err));
        }
    };
    logging::init(&config)?;

    let result = match cli.command {
        Some(Commands::Credentials) => {
            tweetdump_core::credentials::ensure_and_load(&config.credentials_path)
                .map(|_| {
                    tracing::info!(
                        path = %config.credentials_path.display(),
                        "credentials file is valid"
                    );
                })
                .map_err(anyhow::Error::from)
        }
        Some(Commands::Collect {
            handles,
            max_per_account,
            dry_run,
        }) => {
            apply_overrides(&mut config, &handles, max_per_account)?;
            if dry_run {
                println!(
                    "dry-run: would collect up to {} posts each for {} accounts: [{}]",
                    config.max_posts_per_account,
                    config.handles.len(),
                    config.handles.join(", ")
                );
                return Ok(());
            }
            collect::run_collect(&config).await.map(|_| ())
        }
        None => collect::run_collect(&config).await.map(|_| ()),
    };

    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "run aborted");
    }
    result
}

/// Logs a configuration failure and wraps it for the exit path.
fn report_config_error(err: tweetdump_core::ConfigError) -> anyhow::Error {
    tracing::error!(error = %err, "invalid configuration");
    anyhow::Error::from(err).context("invalid configuration")
}

/// Applies `collect` flags on top of the environment configuration.
fn apply_overrides(
    config: &mut tweetdump_core::AppConfig,
    handles: &[String],
    max_per_account: Option<usize>,
) -> anyhow::Result<()> {
    if !handles.is_empty() {
        config.handles = tweetdump_core::config::parse_handles(&handles.join(","));
        anyhow::ensure!(!config.handles.is_empty(), "--handle values are all empty");
    }
    if let Some(max) = max_per_account {
        anyhow::ensure!(max > 0, "--max-per-account must be at least 1");
        config.max_posts_per_account = max;
    }
    Ok(())
}

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;
