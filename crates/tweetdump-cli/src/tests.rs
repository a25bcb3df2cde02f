use super::*;
use crate::test_support::EventCapture;

fn base_config() -> tweetdump_core::AppConfig {
    tweetdump_core::AppConfig {
        credentials_path: "creds.json".into(),
        output_dir: "out".into(),
        log_file: "run.log".into(),
        log_level: "info".to_owned(),
        handles: vec!["rustlang".to_owned()],
        max_posts_per_account: 50,
        api_base_url: "https://api.twitter.com".to_owned(),
        request_timeout_secs: 30,
        user_agent: "tweetdump-test/0.1".to_owned(),
        page_delay_ms: 0,
        rate_limit_wait_secs: 0,
        rate_limit_max_retries: None,
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["tweetdump"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_credentials_command() {
    let cli = Cli::try_parse_from(["tweetdump", "credentials"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Credentials)));
}

#[test]
fn collect_without_flags_uses_config() {
    let cli = Cli::try_parse_from(["tweetdump", "collect"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            ref handles,
            max_per_account: None,
            dry_run: false
        }) if handles.is_empty()
    ));
}

#[test]
fn collect_accepts_repeated_handles() {
    let cli = Cli::try_parse_from([
        "tweetdump",
        "collect",
        "--handle",
        "rustlang",
        "--handle",
        "tokio_rs",
        "--max-per-account",
        "10",
        "--dry-run",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Collect {
            handles,
            max_per_account,
            dry_run,
        }) => {
            assert_eq!(handles, vec!["rustlang", "tokio_rs"]);
            assert_eq!(max_per_account, Some(10));
            assert!(dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn collect_rejects_non_numeric_max() {
    let result = Cli::try_parse_from(["tweetdump", "collect", "--max-per-account", "many"]);
    assert!(result.is_err());
}

#[test]
fn overrides_replace_handles_and_cap() {
    let mut config = base_config();
    apply_overrides(&mut config, &["@serde_rs".to_owned()], Some(5)).unwrap();
    assert_eq!(config.handles, vec!["serde_rs"]);
    assert_eq!(config.max_posts_per_account, 5);
}

#[test]
fn overrides_keep_config_when_flags_absent() {
    let mut config = base_config();
    apply_overrides(&mut config, &[], None).unwrap();
    assert_eq!(config.handles, vec!["rustlang"]);
    assert_eq!(config.max_posts_per_account, 50);
}

#[test]
fn overrides_reject_zero_cap() {
    let mut config = base_config();
    assert!(apply_overrides(&mut config, &[], Some(0)).is_err());
}

#[test]
fn config_error_is_logged_before_exit() {
    let errors = EventCapture::new(tracing::Level::ERROR);
    let err = {
        let _guard = errors.install();
        report_config_error(tweetdump_core::ConfigError::InvalidEnvVar {
            var: "TWEETDUMP_PAGE_DELAY_MS".to_owned(),
            reason: "expected an integer".to_owned(),
        })
    };

    let logged = errors.events();
    assert_eq!(logged.len(), 1, "expected one error event, got {logged:?}");
    assert!(logged[0].contains("TWEETDUMP_PAGE_DELAY_MS"));
    let rendered = format!("{err:#}");
    assert!(rendered.starts_with("invalid configuration"), "{rendered}");
    assert!(rendered.contains("expected an integer"), "{rendered}");
}
