// Social media source: Twitter v2 recent search.
//
// Builds an OR query from the hazard keywords, excludes retweets (they
// duplicate the original post's text), and resolves author usernames from
// the `includes.users` expansion. Requests are paced by a rate limiter
// because the search endpoint's quota is small.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::client::HttpClient;
use super::models::{CollectParams, RawReport};
use super::rate_limiter::RateLimiter;
use super::traits::DataSource;

pub const SOURCE_NAME: &str = "twitter";

/// Recent search accepts between 10 and 100 results per request.
const MIN_RESULTS: usize = 10;
const MAX_RESULTS: usize = 100;

pub struct SocialMediaSource {
    client: HttpClient,
    api_url: String,
    bearer_token: String,
    default_keywords: Vec<String>,
    rate_limiter: RateLimiter,
}

impl SocialMediaSource {
    pub fn new(api_url: &str, bearer_token: &str, default_keywords: Vec<String>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
            default_keywords,
            rate_limiter: RateLimiter::per_second(1.0),
        })
    }
}

/// Build the search query: quoted phrases joined by OR, retweets excluded.
pub fn build_query(keywords: &[String]) -> String {
    let terms: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| {
            if k.contains(' ') {
                format!("\"{k}\"")
            } else {
                k.to_string()
            }
        })
        .collect();

    let joined = terms.join(" OR ");
    if terms.len() > 1 {
        format!("({joined}) -is:retweet")
    } else {
        format!("{joined} -is:retweet")
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    includes: Option<Includes>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    text: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    author_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    username: String,
}

#[async_trait]
impl DataSource for SocialMediaSource {
    async fn collect(&self, params: &CollectParams) -> Result<Vec<RawReport>> {
        let keywords = if params.keywords.is_empty() {
            &self.default_keywords
        } else {
            &params.keywords
        };
        if keywords.is_empty() {
            anyhow::bail!("Social media search needs at least one keyword");
        }

        let query = build_query(keywords);
        info!(query = %query, "Collecting social media posts");

        let max_results = params
            .limit
            .unwrap_or(MAX_RESULTS)
            .clamp(MIN_RESULTS, MAX_RESULTS)
            .to_string();
        let start_time = params.since.map(|s| s.to_rfc3339());

        let mut query_params: Vec<(&str, &str)> = vec![
            ("query", &query),
            ("max_results", &max_results),
            ("tweet.fields", "created_at,author_id"),
            ("expansions", "author_id"),
            ("user.fields", "username"),
        ];
        if let Some(ref s) = start_time {
            query_params.push(("start_time", s));
        }

        self.rate_limiter.acquire().await;

        let url = format!("{}/2/tweets/search/recent", self.api_url);
        let response: SearchResponse = self
            .client
            .get_json(&url, &query_params, Some(&self.bearer_token))
            .await?;

        let usernames: HashMap<String, String> = response
            .includes
            .map(|inc| inc.users.into_iter().map(|u| (u.id, u.username)).collect())
            .unwrap_or_default();

        debug!(count = response.data.len(), "Tweets received");

        let reports = response
            .data
            .into_iter()
            .map(|tweet| {
                let author = tweet
                    .author_id
                    .as_ref()
                    .and_then(|id| usernames.get(id))
                    .map(|name| format!("@{name}"));
                RawReport {
                    url: Some(format!("https://twitter.com/i/web/status/{}", tweet.id)),
                    id: format!("tweet_{}", tweet.id),
                    source: SOURCE_NAME.to_string(),
                    title: None,
                    text: tweet.text,
                    location: None,
                    latitude: None,
                    longitude: None,
                    timestamp: tweet.created_at.unwrap_or_else(Utc::now),
                    reported_type: None,
                    reported_severity: None,
                    author,
                }
            })
            .collect();

        Ok(params.apply(reports))
    }
}
