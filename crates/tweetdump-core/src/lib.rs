pub mod app_config;
pub mod config;
pub mod credentials;
pub mod json;
pub mod posts;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::{CredentialError, Credentials};
pub use posts::{
    AccountId, AuthorSummary, CollectionResult, Entities, MediaItem, MediaMetrics, Mention,
    PostMetrics, PostRecord, ReferencedPost, UrlEntity,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
