// Monitor: runs the collect -> analyze -> prioritize -> persist cycle and
// owns the dashboard state.
//
// Only one refresh runs at a time. The background loop and manual refreshes
// (POST /api/refresh, `ohm serve` startup) share the same guard; a second
// caller gets an "already running" error instead of queueing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::{watch, Mutex, OwnedMutexGuard, RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::state::{DashboardItem, MonitorState};
use crate::config::Config;
use crate::db::models::{format_timestamp, CollectionRun, StoredReport};
use crate::db::Database;
use crate::detection::models::AnalyzedReport;
use crate::detection::HazardDetector;
use crate::nlp::trending::{trending_terms, TrendingTerm};
use crate::sources::models::RawReport;
use crate::sources::{build_collector, DataCollector};

/// Scan-state key holding the time of the last successful refresh.
pub const LAST_REFRESH_KEY: &str = "last_refresh_at";

/// Upper bound on the retry delay after a failed refresh.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Live status of the refresh cycle, exposed via GET /api/status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshStatus {
    /// True while a refresh is in progress.
    pub running: bool,
    /// RFC 3339 timestamp of when the current/last refresh started.
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    /// Human-readable progress message updated as phases complete.
    pub progress_message: String,
    /// Error message from the last refresh, if it failed.
    pub last_error: Option<String>,
}

/// What one refresh did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshSummary {
    pub collected: usize,
    pub hazards: usize,
    pub source_errors: usize,
    pub pruned: usize,
}

pub struct Monitor {
    collector: DataCollector,
    detector: HazardDetector,
    db: Option<Arc<dyn Database>>,
    history_limit: usize,
    state: RwLock<MonitorState>,
    status: RwLock<RefreshStatus>,
    refresh_guard: Arc<Mutex<()>>,
}

impl Monitor {
    pub fn new(collector: DataCollector, detector: HazardDetector, history_limit: usize) -> Self {
        Self {
            collector,
            detector,
            db: None,
            history_limit,
            state: RwLock::new(MonitorState::new(history_limit)),
            status: RwLock::new(RefreshStatus::default()),
            refresh_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Persist every refresh to `db`.
    pub fn with_database(mut self, db: Arc<dyn Database>) -> Self {
        self.db = Some(db);
        self
    }

    /// Wire sources and the detector from configuration.
    pub fn from_config(config: &Config, db: Option<Arc<dyn Database>>) -> Result<Self> {
        let collector = build_collector(config)?;
        let detector = HazardDetector::new()?;
        let monitor = Self::new(collector, detector, config.history_limit);
        Ok(match db {
            Some(db) => monitor.with_database(db),
            None => monitor,
        })
    }

    pub fn collector(&self) -> &DataCollector {
        &self.collector
    }

    pub fn database(&self) -> Option<&Arc<dyn Database>> {
        self.db.as_ref()
    }

    /// Read access to the dashboard state.
    pub async fn state(&self) -> RwLockReadGuard<'_, MonitorState> {
        self.state.read().await
    }

    pub async fn status(&self) -> RefreshStatus {
        self.status.read().await.clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_guard.try_lock().is_err()
    }

    /// Analyze free text outside the refresh cycle.
    pub fn analyze_text(&self, text: &str) -> AnalyzedReport {
        let id = format!("adhoc_{}", Utc::now().timestamp_millis());
        let report = RawReport::new(id, "adhoc", text);
        self.detector.analyze_report(&report)
    }

    /// Trending terms across the current dashboard items.
    pub async fn trending(&self, top_n: usize) -> Vec<TrendingTerm> {
        let texts: Vec<String> = self
            .state
            .read()
            .await
            .current()
            .iter()
            .map(|i| i.description.clone())
            .collect();
        trending_terms(&texts, top_n)
    }

    /// Run one refresh now. Fails if another refresh is in progress.
    pub async fn refresh(&self) -> Result<RefreshSummary> {
        let Ok(_guard) = self.refresh_guard.try_lock() else {
            anyhow::bail!("A refresh is already running");
        };
        self.run_refresh().await
    }

    async fn run_refresh(&self) -> Result<RefreshSummary> {
        let started = Utc::now();
        {
            let mut s = self.status.write().await;
            s.running = true;
            s.started_at = Some(format_timestamp(started));
            s.finished_at = None;
            s.progress_message = "Collecting from sources…".to_string();
        }

        let result = self.refresh_inner(started).await;

        let mut status = self.status.write().await;
        status.running = false;
        status.finished_at = Some(format_timestamp(Utc::now()));
        match &result {
            Ok(summary) => {
                info!(
                    collected = summary.collected,
                    hazards = summary.hazards,
                    source_errors = summary.source_errors,
                    "Refresh completed"
                );
                status.last_error = None;
                status.progress_message = format!(
                    "Completed: {} reports collected, {} hazards",
                    summary.collected, summary.hazards
                );
            }
            Err(e) => {
                error!(error = %e, "Refresh failed");
                status.last_error = Some(e.to_string());
                status.progress_message = "Refresh failed, see server logs".to_string();
            }
        }
        result
    }

    async fn refresh_inner(&self, started: chrono::DateTime<Utc>) -> Result<RefreshSummary> {
        let collection = self.collector.collect_all(&HashMap::new()).await;
        let source_errors = collection.error_count();
        if !collection.outcomes.is_empty() && source_errors == collection.outcomes.len() {
            let first = collection
                .outcomes
                .iter()
                .find_map(|o| o.error.clone())
                .unwrap_or_default();
            anyhow::bail!("All {source_errors} sources failed (first error: {first})");
        }

        self.set_progress(format!("Analyzing {} reports…", collection.reports.len()))
            .await;
        let analyzed = self.detector.analyze_batch_reports(&collection.reports);
        let prioritized = self.detector.prioritize_reports(analyzed);

        let items: Vec<DashboardItem> = prioritized.iter().map(DashboardItem::from).collect();
        self.state.write().await.update(items, Utc::now());

        let mut summary = RefreshSummary {
            collected: collection.reports.len(),
            hazards: prioritized.len(),
            source_errors,
            pruned: 0,
        };

        if let Some(ref db) = self.db {
            self.set_progress("Saving reports…".to_string()).await;
            let stored: Vec<StoredReport> =
                prioritized.iter().map(StoredReport::from_analyzed).collect();
            db.upsert_reports(&stored)
                .await
                .context("Failed to save analyzed reports")?;

            let keep = u32::try_from(self.history_limit).unwrap_or(u32::MAX);
            summary.pruned = db.prune_reports(keep).await?;

            let errors: Vec<String> = collection
                .outcomes
                .iter()
                .filter_map(|o| o.error.as_ref().map(|e| format!("{}: {e}", o.name)))
                .collect();
            let finished = format_timestamp(Utc::now());
            db.record_collection_run(&CollectionRun {
                id: 0,
                started_at: format_timestamp(started),
                finished_at: finished.clone(),
                collected: summary.collected as u32,
                hazards: summary.hazards as u32,
                errors: source_errors as u32,
                error: (!errors.is_empty()).then(|| errors.join("; ")),
            })
            .await?;
            db.set_scan_state(LAST_REFRESH_KEY, &finished).await?;
        }

        if source_errors > 0 {
            warn!(source_errors, "Refresh completed with failing sources");
        }
        Ok(summary)
    }

    async fn set_progress(&self, message: String) {
        self.status.write().await.progress_message = message;
    }
}

/// Start a refresh in a background task. Returns false without starting
/// anything when a refresh is already running.
pub fn launch_refresh(monitor: Arc<Monitor>) -> bool {
    let guard: OwnedMutexGuard<()> = match monitor.refresh_guard.clone().try_lock_owned() {
        Ok(guard) => guard,
        Err(_) => return false,
    };
    tokio::spawn(async move {
        let _guard = guard;
        if let Err(e) = monitor.run_refresh().await {
            error!(error = %e, "Background refresh failed");
        }
    });
    true
}

/// Refresh every `interval` until `shutdown` flips to true (or its sender is
/// dropped), interrupting an in-flight refresh if needed. After a failed
/// refresh the next attempt comes sooner, after `min(interval, 10s)`.
pub fn spawn_refresh_loop(
    monitor: Arc<Monitor>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting refresh loop");
        loop {
            if *shutdown.borrow() {
                break;
            }

            // A refresh stuck on a slow source is abandoned on shutdown
            let result = tokio::select! {
                result = monitor.refresh() => result,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            };

            let wait = match result {
                Ok(_) => interval,
                Err(e) => {
                    warn!(error = %e, "Refresh loop iteration failed, retrying soon");
                    interval.min(MAX_RETRY_DELAY)
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Refresh loop stopped");
    })
}
