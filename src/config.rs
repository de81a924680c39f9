//! Runtime settings loaded from `~/.config/replypulse/config.toml`.
//!
//! Every field has a built-in default, so the pipeline runs with no
//! config file at all. CLI flags override file values in `main`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::QuotaPolicy;
use crate::model::{TrackedAuthorSet, DEFAULT_AUTHORS};

/// All tunables for one pipeline run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Author handles to track, in polling order.
    pub authors: Vec<String>,
    /// Base URL of the platform instance.
    pub instance: String,
    /// Recent original posts fetched per author.
    pub posts_per_author: usize,
    /// Mention-search results requested per page.
    pub reply_page_size: usize,
    /// Maximum search pages walked per post.
    pub reply_page_limit: usize,
    /// Suspend when remaining calls drop below this.
    pub quota_low_water_mark: u32,
    /// Cooldown length in seconds (one quota window).
    pub quota_cooldown_secs: u64,
    /// Snapshot file used as fallback input.
    pub snapshot_path: PathBuf,
    /// Report artifact destination.
    pub report_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            authors: DEFAULT_AUTHORS.iter().map(|&a| a.to_string()).collect(),
            instance: "https://mastodon.social".to_string(),
            posts_per_author: 5,
            reply_page_size: 40,
            reply_page_limit: 3,
            quota_low_water_mark: 101,
            quota_cooldown_secs: 15 * 60,
            snapshot_path: PathBuf::from("data.json"),
            report_path: PathBuf::from("report.html"),
        }
    }
}

impl Settings {
    /// Load settings. An explicit path must exist; the default path is
    /// optional and falls back to built-in defaults when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("invalid TOML in {}", path.display()))?;

        Ok(settings)
    }

    /// The quota policy this configuration describes.
    #[must_use]
    pub fn quota_policy(&self) -> QuotaPolicy {
        QuotaPolicy {
            low_water_mark: self.quota_low_water_mark,
            cooldown: Duration::from_secs(self.quota_cooldown_secs),
        }
    }

    /// The immutable tracked-author set for this run.
    #[must_use]
    pub fn tracked_authors(&self) -> TrackedAuthorSet {
        TrackedAuthorSet::new(self.authors.iter().cloned())
    }
}

/// Default config file location.
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("replypulse")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let settings = Settings::default();
        assert_eq!(settings.authors, DEFAULT_AUTHORS);
        assert_eq!(settings.posts_per_author, 5);
        assert_eq!(settings.quota_low_water_mark, 101);
        assert_eq!(settings.quota_cooldown_secs, 900);
        assert_eq!(settings.snapshot_path, PathBuf::from("data.json"));
    }

    #[test]
    fn parse_empty_config_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.instance, "https://mastodon.social");
        assert_eq!(settings.reply_page_limit, 3);
    }

    #[test]
    fn parse_partial_config_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
authors = ["someone"]
posts_per_author = 2
"#,
        )
        .unwrap();
        assert_eq!(settings.authors, vec!["someone"]);
        assert_eq!(settings.posts_per_author, 2);
        assert_eq!(settings.reply_page_size, 40);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<Settings, _> = toml::from_str("no_such_field = true");
        assert!(result.is_err());
    }

    #[test]
    fn quota_policy_reflects_settings() {
        let settings: Settings = toml::from_str(
            r#"
quota_low_water_mark = 10
quota_cooldown_secs = 60
"#,
        )
        .unwrap();
        let policy = settings.quota_policy();
        assert_eq!(policy.low_water_mark, 10);
        assert_eq!(policy.cooldown, Duration::from_secs(60));
    }

    #[test]
    fn tracked_authors_come_from_config_order() {
        let settings: Settings = toml::from_str(r#"authors = ["b", "a", "b"]"#).unwrap();
        let set = settings.tracked_authors();
        let handles: Vec<&str> = set.iter().collect();
        assert_eq!(handles, vec!["b", "a"]);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/replypulse.toml")));
        assert!(result.is_err());
    }
}
