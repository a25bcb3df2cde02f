//! API credential file: bootstrapping, loading, and placeholder validation.
//!
//! The file is a flat JSON object with five string keys. On first run a
//! placeholder copy is written and the caller is told to stop; the operator
//! fills in real values and runs again.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::json::to_indented_json;

const PLACEHOLDER_CONSUMER_KEY: &str = "YOUR_CONSUMER_KEY";
const PLACEHOLDER_CONSUMER_SECRET: &str = "YOUR_CONSUMER_SECRET";
const PLACEHOLDER_ACCESS_TOKEN: &str = "YOUR_ACCESS_TOKEN";
const PLACEHOLDER_ACCESS_TOKEN_SECRET: &str = "YOUR_ACCESS_TOKEN_SECRET";
const PLACEHOLDER_BEARER_TOKEN: &str = "YOUR_BEARER_TOKEN";

/// Fatal credential problems. Every variant stops the run before any network
/// activity; the binary maps them to a non-zero exit.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credentials file {path} was missing; a placeholder has been written. Fill in your API credentials and run again")]
    PlaceholderCreated { path: String },

    #[error("credentials file {path} is not valid JSON ({source}); a placeholder has been written. Fill in your API credentials and run again")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("credentials file {path} has an unexpected shape: {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("credential `{field}` in {path} has not been updated from its placeholder value")]
    NotConfigured { path: String, field: &'static str },

    #[error("failed to access credentials file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The API credential bundle.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub bearer_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"[redacted]")
            .field("consumer_secret", &"[redacted]")
            .field("access_token", &"[redacted]")
            .field("access_token_secret", &"[redacted]")
            .field("bearer_token", &"[redacted]")
            .finish()
    }
}

impl Credentials {
    /// The sample bundle written on first run.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            consumer_key: PLACEHOLDER_CONSUMER_KEY.to_owned(),
            consumer_secret: PLACEHOLDER_CONSUMER_SECRET.to_owned(),
            access_token: PLACEHOLDER_ACCESS_TOKEN.to_owned(),
            access_token_secret: PLACEHOLDER_ACCESS_TOKEN_SECRET.to_owned(),
            bearer_token: PLACEHOLDER_BEARER_TOKEN.to_owned(),
        }
    }

    /// Returns the name of the first field still holding its placeholder value.
    #[must_use]
    pub fn first_placeholder_field(&self) -> Option<&'static str> {
        [
            ("consumer_key", &self.consumer_key, PLACEHOLDER_CONSUMER_KEY),
            ("consumer_secret", &self.consumer_secret, PLACEHOLDER_CONSUMER_SECRET),
            ("access_token", &self.access_token, PLACEHOLDER_ACCESS_TOKEN),
            (
                "access_token_secret",
                &self.access_token_secret,
                PLACEHOLDER_ACCESS_TOKEN_SECRET,
            ),
            ("bearer_token", &self.bearer_token, PLACEHOLDER_BEARER_TOKEN),
        ]
        .into_iter()
        .find(|(_, value, placeholder)| value.as_str() == *placeholder)
        .map(|(field, _, _)| field)
    }
}

/// Writes a placeholder credentials file at `path` if none exists.
///
/// # Errors
///
/// Returns [`CredentialError::PlaceholderCreated`] after writing the
/// placeholder, or [`CredentialError::Io`] if the write fails. Returns `Ok`
/// only when the file already existed.
pub fn ensure(path: &Path) -> Result<(), CredentialError> {
    if path.exists() {
        return Ok(());
    }
    write_placeholder(path)?;
    tracing::info!(path = %path.display(), "sample credentials file created");
    Err(CredentialError::PlaceholderCreated {
        path: path.display().to_string(),
    })
}

/// Loads and validates the credentials file at `path`.
///
/// A syntactically broken file is replaced by the placeholder before
/// returning [`CredentialError::Malformed`].
///
/// # Errors
///
/// Returns [`CredentialError`] if the file cannot be read or parsed, or if any
/// field still equals its placeholder value.
pub fn load(path: &Path) -> Result<Credentials, CredentialError> {
    let shown = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| CredentialError::Io {
        path: shown.clone(),
        source: e,
    })?;

    let credentials: Credentials = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) if e.is_syntax() || e.is_eof() => {
            tracing::error!(path = %shown, error = %e, "invalid JSON in credentials file");
            write_placeholder(path)?;
            return Err(CredentialError::Malformed {
                path: shown,
                source: e,
            });
        }
        Err(e) => {
            return Err(CredentialError::Invalid {
                path: shown,
                source: e,
            })
        }
    };

    if let Some(field) = credentials.first_placeholder_field() {
        return Err(CredentialError::NotConfigured {
            path: shown,
            field,
        });
    }

    Ok(credentials)
}

/// Runs [`ensure`] then [`load`].
///
/// # Errors
///
/// Propagates any [`CredentialError`] from either step.
pub fn ensure_and_load(path: &Path) -> Result<Credentials, CredentialError> {
    ensure(path)?;
    load(path)
}

fn write_placeholder(path: &Path) -> Result<(), CredentialError> {
    let io_err = |source| CredentialError::Io {
        path: path.display().to_string(),
        source,
    };
    let body = to_indented_json(&Credentials::placeholder())
        .map_err(|e| io_err(std::io::Error::other(e)))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, body).map_err(io_err)
}
