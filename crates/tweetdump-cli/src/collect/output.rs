//! Per-account and combined JSON output files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use tweetdump_core::json::to_indented_json;
use tweetdump_core::{CollectionResult, PostRecord};

/// Writes output files into one directory, creating it on construction.
pub(crate) struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub(crate) fn create(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Writes `{handle}_{stamp}.json` holding the account's posts.
    pub(crate) fn write_account<Tz: TimeZone>(
        &self,
        handle: &str,
        posts: &[PostRecord],
        at: DateTime<Tz>,
    ) -> anyhow::Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        let path = self.dir.join(format!("{handle}_{}.json", file_stamp(&at)));
        write_json(&path, posts)?;
        Ok(path)
    }

    /// Writes `all_tweets_{stamp}.json` mapping handle to posts.
    pub(crate) fn write_combined<Tz: TimeZone>(
        &self,
        result: &CollectionResult,
        at: DateTime<Tz>,
    ) -> anyhow::Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        let path = self.dir.join(format!("all_tweets_{}.json", file_stamp(&at)));
        write_json(&path, result)?;
        Ok(path)
    }
}

/// `yyyyMMdd_HHmmss` in the timestamp's own time zone.
pub(crate) fn file_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d_%H%M%S").to_string()
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = to_indented_json(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}
