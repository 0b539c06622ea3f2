// DataCollector: runs every registered source and merges the results.
//
// Sources are collected concurrently, but the merged list keeps registration
// order so output is stable run to run. A failing source is logged and
// contributes nothing; it never aborts the whole collection.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use indicatif::ProgressBar;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::citizen::CitizenReportSource;
use super::models::{CollectParams, RawReport};
use super::news::NewsFeedSource;
use super::sample::{SampleFeed, SampleSource};
use super::social::SocialMediaSource;
use super::traits::DataSource;
use crate::config::{Config, RunMode};
use crate::output::export::{self, ExportFormat};

/// How a single source fared during a collection.
#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub name: String,
    pub collected: usize,
    pub error: Option<String>,
}

/// Result of collecting from every registered source.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub reports: Vec<RawReport>,
    pub outcomes: Vec<SourceOutcome>,
}

impl Collection {
    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

#[derive(Default)]
pub struct DataCollector {
    sources: Vec<(String, Arc<dyn DataSource>)>,
    collected: RwLock<Vec<RawReport>>,
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under `name`. Re-registering a name replaces the
    /// old source but keeps its position.
    pub fn register_source(&mut self, name: &str, source: Arc<dyn DataSource>) {
        if let Some(slot) = self.sources.iter_mut().find(|(n, _)| n == name) {
            slot.1 = source;
            info!(source = name, "Replaced data source");
        } else {
            self.sources.push((name.to_string(), source));
            info!(source = name, "Registered data source");
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Collect from every registered source. `params` is keyed by source
    /// name; sources without an entry get default parameters.
    pub async fn collect_all(&self, params: &HashMap<String, CollectParams>) -> Collection {
        self.collect_inner(params, None).await
    }

    /// Same as `collect_all`, ticking `progress` once per finished source.
    pub async fn collect_all_with_progress(
        &self,
        params: &HashMap<String, CollectParams>,
        progress: &ProgressBar,
    ) -> Collection {
        self.collect_inner(params, Some(progress)).await
    }

    async fn collect_inner(
        &self,
        params: &HashMap<String, CollectParams>,
        progress: Option<&ProgressBar>,
    ) -> Collection {
        let default_params = CollectParams::default();

        let futures = self.sources.iter().map(|(name, source)| {
            let source_params = params.get(name).unwrap_or(&default_params);
            async move {
                info!(source = %name, "Collecting data");
                let result = source.collect(source_params).await;
                if let Some(pb) = progress {
                    pb.set_message(name.clone());
                    pb.inc(1);
                }
                (name, result)
            }
        });

        let mut collection = Collection::default();
        for (name, result) in join_all(futures).await {
            match result {
                Ok(reports) => {
                    info!(source = %name, count = reports.len(), "Collected items");
                    collection.outcomes.push(SourceOutcome {
                        name: name.clone(),
                        collected: reports.len(),
                        error: None,
                    });
                    collection.reports.extend(reports);
                }
                Err(e) => {
                    error!(source = %name, error = %e, "Error collecting data");
                    collection.outcomes.push(SourceOutcome {
                        name: name.clone(),
                        collected: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        *self.collected.write().await = collection.reports.clone();
        collection
    }

    /// Collect from one named source only.
    pub async fn collect_from(&self, name: &str, params: &CollectParams) -> Result<Vec<RawReport>> {
        let Some((_, source)) = self.sources.iter().find(|(n, _)| n == name) else {
            anyhow::bail!(
                "Source not found: {name} (registered: {})",
                self.source_names().join(", ")
            );
        };

        info!(source = name, "Collecting data");
        let reports = source.collect(params).await?;
        *self.collected.write().await = reports.clone();
        Ok(reports)
    }

    /// The reports from the most recent collection.
    pub async fn collected(&self) -> Vec<RawReport> {
        self.collected.read().await.clone()
    }

    /// Write the most recent collection to a file. Returns the number of
    /// records written; an empty collection writes nothing.
    pub async fn save_data(&self, path: &Path, format: ExportFormat) -> Result<usize> {
        let data = self.collected.read().await;
        if data.is_empty() {
            warn!("No data to save");
            return Ok(0);
        }
        let written = export::write_records(path, format, &data)?;
        info!(count = written, path = %path.display(), "Saved collected data");
        Ok(written)
    }
}

/// Build the collector for the configured sources.
///
/// Real sources are registered when configured. In development mode, each
/// unconfigured channel falls back to its sample feed and the agency bulletin
/// sample is always added. Production mode with nothing configured fails.
pub fn build_collector(config: &Config) -> Result<DataCollector> {
    config.require_sources()?;
    let dev = config.mode == RunMode::Development;
    let mut collector = DataCollector::new();

    match config.citizen_reports_url {
        Some(ref url) => collector.register_source(
            SampleFeed::CitizenReports.channel_name(),
            Arc::new(CitizenReportSource::new(url)?),
        ),
        None if dev => collector.register_source(
            SampleFeed::CitizenReports.channel_name(),
            Arc::new(SampleSource::new(SampleFeed::CitizenReports)),
        ),
        None => {}
    }

    match config.twitter_bearer_token {
        Some(ref token) => collector.register_source(
            SampleFeed::SocialMedia.channel_name(),
            Arc::new(SocialMediaSource::new(
                &config.twitter_api_url,
                token,
                config.social_keywords.clone(),
            )?),
        ),
        None if dev => collector.register_source(
            SampleFeed::SocialMedia.channel_name(),
            Arc::new(SampleSource::new(SampleFeed::SocialMedia)),
        ),
        None => {}
    }

    if !config.news_feed_urls.is_empty() {
        collector.register_source(
            SampleFeed::NewsFeeds.channel_name(),
            Arc::new(NewsFeedSource::new(config.news_feed_urls.clone())?),
        );
    } else if dev {
        collector.register_source(
            SampleFeed::NewsFeeds.channel_name(),
            Arc::new(SampleSource::new(SampleFeed::NewsFeeds)),
        );
    }

    if dev {
        collector.register_source(
            SampleFeed::AgencyBulletins.channel_name(),
            Arc::new(SampleSource::new(SampleFeed::AgencyBulletins)),
        );
    }

    Ok(collector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSource(Vec<&'static str>);

    #[async_trait]
    impl DataSource for FixedSource {
        async fn collect(&self, params: &CollectParams) -> Result<Vec<RawReport>> {
            let reports = self
                .0
                .iter()
                .map(|id| RawReport::new(*id, "fixed", "text"))
                .collect();
            Ok(params.apply(reports))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DataSource for FailingSource {
        async fn collect(&self, _params: &CollectParams) -> Result<Vec<RawReport>> {
            anyhow::bail!("upstream unavailable")
        }
    }

    #[tokio::test]
    async fn failing_source_is_skipped() {
        let mut collector = DataCollector::new();
        collector.register_source("a", Arc::new(FixedSource(vec!["a1", "a2"])));
        collector.register_source("broken", Arc::new(FailingSource));
        collector.register_source("b", Arc::new(FixedSource(vec!["b1"])));

        let collection = collector.collect_all(&HashMap::new()).await;
        let ids: Vec<&str> = collection.reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.outcomes[1].name, "broken");
        assert_eq!(collector.collected().await.len(), 3);
    }

    #[tokio::test]
    async fn per_source_params_are_routed_by_name() {
        let mut collector = DataCollector::new();
        collector.register_source("a", Arc::new(FixedSource(vec!["a1", "a2", "a3"])));
        collector.register_source("b", Arc::new(FixedSource(vec!["b1", "b2"])));

        let mut params = HashMap::new();
        params.insert(
            "a".to_string(),
            CollectParams {
                limit: Some(1),
                ..CollectParams::default()
            },
        );

        let collection = collector.collect_all(&params).await;
        assert_eq!(collection.reports.len(), 3);
    }

    #[tokio::test]
    async fn re_registering_replaces_in_place() {
        let mut collector = DataCollector::new();
        collector.register_source("a", Arc::new(FixedSource(vec!["old"])));
        collector.register_source("b", Arc::new(FixedSource(vec!["b1"])));
        collector.register_source("a", Arc::new(FixedSource(vec!["new"])));

        assert_eq!(collector.source_names(), vec!["a", "b"]);
        let collection = collector.collect_all(&HashMap::new()).await;
        assert_eq!(collection.reports[0].id, "new");
    }

    #[tokio::test]
    async fn unknown_source_is_an_error() {
        let collector = DataCollector::new();
        assert!(collector
            .collect_from("nope", &CollectParams::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn saving_empty_collection_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let collector = DataCollector::new();
        let written = collector.save_data(&path, ExportFormat::Json).await.unwrap();
        assert_eq!(written, 0);
        assert!(!path.exists());
    }

    #[test]
    fn development_collector_uses_sample_feeds() {
        let collector = build_collector(&Config::default()).unwrap();
        assert_eq!(
            collector.source_names(),
            vec!["citizen_reports", "social_media", "news_feeds", "agency_bulletins"]
        );
    }

    #[tokio::test]
    async fn production_collector_registers_only_configured_sources() {
        let config = Config {
            mode: RunMode::Production,
            // Nothing listens on the discard port
            citizen_reports_url: Some("http://127.0.0.1:9/reports".to_string()),
            news_feed_urls: vec!["http://127.0.0.1:9/feed.json".to_string()],
            ..Config::default()
        };
        let collector = build_collector(&config).unwrap();
        assert_eq!(collector.source_names(), vec!["citizen_reports", "news_feeds"]);

        // A real HTTP source, not the sample feed
        assert!(collector
            .collect_from("citizen_reports", &CollectParams::default())
            .await
            .is_err());
    }

    #[test]
    fn production_collector_without_sources_fails() {
        let config = Config {
            mode: RunMode::Production,
            ..Config::default()
        };
        assert!(build_collector(&config).is_err());
    }
}
