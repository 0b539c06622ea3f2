use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;

/// Default Twitter API base URL for the social media source.
pub const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com";

/// Keywords used for social media search when none are given explicitly.
pub const DEFAULT_SOCIAL_KEYWORDS: &[&str] = &["ocean hazard", "coastal flooding", "storm surge"];

/// How the system is being run.
///
/// Development mode fills unconfigured source channels with built-in sample
/// data so the whole pipeline can be exercised offline. Production mode only
/// uses real, configured sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Development => "development",
            RunMode::Production => "production",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RunMode::Development),
            "production" | "prod" => Ok(RunMode::Production),
            other => anyhow::bail!(
                "Unknown run mode '{other}' (expected 'development' or 'production')"
            ),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: RunMode,
    pub db_path: String,
    /// Directory for the plain-text log file (ohm.log)
    pub log_dir: PathBuf,
    /// Seconds between dashboard refreshes
    pub refresh_interval_secs: u64,
    /// Maximum number of analyzed reports kept in history
    pub history_limit: usize,
    /// Citizen report API endpoint (JSON array of reports)
    pub citizen_reports_url: Option<String>,
    /// Bearer token for the Twitter v2 recent search endpoint
    pub twitter_bearer_token: Option<String>,
    pub twitter_api_url: String,
    pub social_keywords: Vec<String>,
    /// JSON Feed endpoints carrying news and agency bulletins
    pub news_feed_urls: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::Development,
            db_path: "./ohm.db".to_string(),
            log_dir: PathBuf::from("logs"),
            refresh_interval_secs: 60,
            history_limit: 1000,
            citizen_reports_url: None,
            twitter_bearer_token: None,
            twitter_api_url: DEFAULT_TWITTER_API_URL.to_string(),
            social_keywords: DEFAULT_SOCIAL_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            news_feed_urls: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; a malformed number or run mode is an error
    /// rather than being silently replaced.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let mode = match var("OHM_MODE") {
            Some(raw) => raw.parse().context("Invalid OHM_MODE")?,
            None => defaults.mode,
        };

        let refresh_interval_secs = match var("OHM_REFRESH_INTERVAL") {
            Some(raw) => raw.parse().with_context(|| {
                format!("OHM_REFRESH_INTERVAL must be a number of seconds, got '{raw}'")
            })?,
            None => defaults.refresh_interval_secs,
        };

        let history_limit = match var("OHM_HISTORY_LIMIT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => anyhow::bail!("OHM_HISTORY_LIMIT must be a positive integer, got '{raw}'"),
            },
            None => defaults.history_limit,
        };

        let social_keywords = var("OHM_SOCIAL_KEYWORDS")
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.social_keywords);

        Ok(Self {
            mode,
            db_path: var("OHM_DB_PATH").unwrap_or(defaults.db_path),
            log_dir: var("OHM_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            refresh_interval_secs,
            history_limit,
            citizen_reports_url: var("CITIZEN_REPORTS_URL"),
            twitter_bearer_token: var("TWITTER_BEARER_TOKEN"),
            twitter_api_url: var("TWITTER_API_URL").unwrap_or(defaults.twitter_api_url),
            social_keywords,
            news_feed_urls: var("NEWS_FEED_URLS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
        })
    }

    /// True if at least one real (network) source is configured.
    pub fn has_real_sources(&self) -> bool {
        self.citizen_reports_url.is_some()
            || self.twitter_bearer_token.is_some()
            || !self.news_feed_urls.is_empty()
    }

    /// Check that production mode has something to collect from.
    /// Development mode always passes, sample feeds fill the gaps.
    pub fn require_sources(&self) -> Result<()> {
        if self.mode == RunMode::Production && !self.has_real_sources() {
            anyhow::bail!(
                "No data sources configured for production mode.\n\
                 Set at least one of CITIZEN_REPORTS_URL, TWITTER_BEARER_TOKEN or NEWS_FEED_URLS\n\
                 in your .env file, or run with --mode development to use sample data."
            );
        }
        Ok(())
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
