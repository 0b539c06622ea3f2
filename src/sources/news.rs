// News feed source: articles and bulletins published as JSON Feed (v1.1).
//
// Each configured URL is fetched in turn. One broken feed shouldn't hide the
// rest, so per-feed failures are logged and skipped; the source only errors
// when every feed failed.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::client::HttpClient;
use super::models::{CollectParams, RawReport};
use super::traits::DataSource;

pub struct NewsFeedSource {
    client: HttpClient,
    feed_urls: Vec<String>,
}

impl NewsFeedSource {
    pub fn new(feed_urls: Vec<String>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            feed_urls,
        })
    }
}

#[derive(Debug, Deserialize)]
struct JsonFeed {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content_text: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    date_published: Option<DateTime<Utc>>,
}

fn feed_to_reports(feed: JsonFeed, feed_url: &str) -> Vec<RawReport> {
    let outlet = feed.title.unwrap_or_else(|| feed_url.to_string());
    feed.items
        .into_iter()
        .map(|item| RawReport {
            id: format!("news_{}", item.id),
            source: outlet.clone(),
            title: item.title,
            text: item.content_text.or(item.summary).unwrap_or_default(),
            location: None,
            latitude: None,
            longitude: None,
            timestamp: item.date_published.unwrap_or_else(Utc::now),
            reported_type: None,
            reported_severity: None,
            author: None,
            url: item.url,
        })
        .collect()
}

#[async_trait]
impl DataSource for NewsFeedSource {
    async fn collect(&self, params: &CollectParams) -> Result<Vec<RawReport>> {
        info!(feeds = self.feed_urls.len(), "Collecting news articles");

        let mut reports = Vec::new();
        let mut failures = 0usize;

        for url in &self.feed_urls {
            match self.client.get_json::<JsonFeed>(url, &[], None).await {
                Ok(feed) => reports.extend(feed_to_reports(feed, url)),
                Err(e) => {
                    failures += 1;
                    warn!(url = %url, error = %e, "News feed fetch failed, skipping");
                }
            }
        }

        if failures > 0 && failures == self.feed_urls.len() {
            anyhow::bail!("All {failures} news feeds failed");
        }

        // Newest first across all feeds before applying the limit
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(params.apply(reports))
    }
}
