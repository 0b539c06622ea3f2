use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use ohm::config::{Config, RunMode};
use ohm::db::models::StoredReport;
use ohm::detection::models::Severity;
use ohm::detection::HazardDetector;
use ohm::output::export::{self, ExportFormat};
use ohm::output::terminal;
use ohm::sources::{build_collector, CollectParams};

/// Ohm: community-powered ocean hazard monitoring.
///
/// Collects reports from citizens, social media and news feeds, detects
/// ocean hazards in the text, and ranks them by urgency.
#[derive(Parser)]
#[command(name = "ohm", version, about)]
struct Cli {
    /// Run mode (overrides OHM_MODE). Development fills unconfigured
    /// sources with sample data.
    #[arg(long, global = true, value_enum)]
    mode: Option<RunMode>,

    /// Verbose logging (ohm=debug)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Collect raw reports from the configured sources
    Collect {
        /// Collect from this source only (e.g. citizen_reports)
        #[arg(long)]
        source: Option<String>,

        /// Social media search keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Max reports per source
        #[arg(long)]
        limit: Option<usize>,

        /// Write the collection to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the file extension, else json)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Detect and prioritize hazards in collected reports or a given text
    Analyze {
        /// Analyze this text instead of collecting
        #[arg(long)]
        text: Option<String>,

        /// Number of prioritized reports to show (default: 20)
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Write the analyzed reports to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the file extension, else json)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Store the analyzed hazard reports in the database
        #[arg(long)]
        save: bool,
    },

    /// Extract keywords from a text
    Keywords {
        text: String,

        /// Number of keywords (default: 10)
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Show stored hazard reports
    Report {
        /// Max reports to show (default: 20)
        #[arg(long, default_value = "20")]
        limit: u32,

        /// Only reports of this severity (high, medium, low, unknown)
        #[arg(long)]
        severity: Option<String>,

        /// Write the reports to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the file extension, else json)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Run the dashboard server with periodic refresh
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Port to listen on
        #[arg(long, default_value = "8050")]
        port: u16,

        /// Seconds between refreshes (overrides OHM_REFRESH_INTERVAL)
        #[arg(long)]
        refresh_interval: Option<u64>,
    },

    /// Show system status (DB stats, last refresh, recent runs)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    init_logging(&config, cli.debug)?;
    info!(mode = %config.mode, "Starting ohm");

    match cli.command {
        Commands::Init => {
            info!("Initializing ohm database...");
            let db = ohm::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nOhm is ready. Configure sources in your .env file");
            println!("  (CITIZEN_REPORTS_URL, TWITTER_BEARER_TOKEN, NEWS_FEED_URLS)");
            println!("\nThen run: ohm serve");
        }

        Commands::Collect {
            source,
            keywords,
            limit,
            output,
            format,
        } => {
            let collector = build_collector(&config)?;
            let params = CollectParams {
                keywords,
                limit,
                since: None,
            };

            match source {
                Some(name) => {
                    let reports = collector.collect_from(&name, &params).await?;
                    println!("Collected {} reports from {}", reports.len(), name);
                }
                None => {
                    let per_source: HashMap<String, CollectParams> = collector
                        .source_names()
                        .into_iter()
                        .map(|n| (n.to_string(), params.clone()))
                        .collect();
                    let pb = terminal::collection_progress(per_source.len());
                    let collection = collector.collect_all_with_progress(&per_source, &pb).await;
                    pb.finish_and_clear();
                    terminal::display_collection_summary(&collection);
                }
            }

            if let Some(path) = output {
                let format = format.unwrap_or_else(|| ExportFormat::from_path(&path));
                let written = collector.save_data(&path, format).await?;
                println!("Saved {} reports to {}", written, path.display());
            }
        }

        Commands::Analyze {
            text,
            limit,
            output,
            format,
            save,
        } => {
            let detector = HazardDetector::new()?;

            let prioritized = match text {
                Some(text) => {
                    let report = ohm::sources::RawReport::new("cli_text", "cli", text);
                    let analyzed = detector.analyze_report(&report);
                    terminal::display_analysis(&analyzed);
                    vec![analyzed]
                }
                None => {
                    let collector = build_collector(&config)?;
                    let pb = terminal::collection_progress(collector.source_names().len());
                    let collection = collector
                        .collect_all_with_progress(&HashMap::new(), &pb)
                        .await;
                    pb.finish_and_clear();
                    terminal::display_collection_summary(&collection);

                    let analyzed = detector.analyze_batch_reports(&collection.reports);
                    let prioritized = detector.prioritize_reports(analyzed);
                    let shown = &prioritized[..prioritized.len().min(limit)];
                    terminal::display_prioritized_reports(shown);

                    let texts: Vec<String> = collection
                        .reports
                        .iter()
                        .map(|r| r.analysis_text())
                        .collect();
                    terminal::display_trending(&ohm::nlp::trending::trending_terms(&texts, 10));
                    prioritized
                }
            };

            if save {
                let db = ohm::db::initialize_sqlite(&config.db_path)?;
                let stored: Vec<StoredReport> = prioritized
                    .iter()
                    .filter(|r| r.is_hazard())
                    .map(StoredReport::from_analyzed)
                    .collect();
                let saved = db.upsert_reports(&stored).await?;
                println!("Saved {} hazard reports to {}", saved, config.db_path);
            }

            if let Some(path) = output {
                let format = format.unwrap_or_else(|| ExportFormat::from_path(&path));
                let written = export::write_records(&path, format, &prioritized)?;
                println!("Wrote {} analyzed reports to {}", written, path.display());
            }
        }

        Commands::Keywords { text, top } => {
            let keywords = ohm::nlp::keywords::extract_keywords(&text, top);
            terminal::display_keywords(&keywords);
        }

        Commands::Report {
            limit,
            severity,
            output,
            format,
        } => {
            let db = ohm::db::open_sqlite(&config.db_path)?;
            let reports = match severity {
                Some(raw) => {
                    let severity: Severity = raw.parse()?;
                    db.get_reports_by_severity(severity.as_str(), limit).await?
                }
                None => db.get_recent_reports(limit).await?,
            };
            terminal::display_stored_reports(&reports);

            if let Some(path) = output {
                let format = format.unwrap_or_else(|| ExportFormat::from_path(&path));
                let written = export::write_records(&path, format, &reports)?;
                println!("\nReport written to {} ({} reports)", path.display(), written);
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve {
            bind,
            port,
            refresh_interval,
        } => {
            let db = ohm::db::initialize_sqlite(&config.db_path)?;
            let monitor = Arc::new(ohm::monitor::Monitor::from_config(&config, Some(db))?);
            let interval = refresh_interval.unwrap_or(config.refresh_interval_secs).max(1);

            let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
            let refresh_task = ohm::monitor::spawn_refresh_loop(
                monitor.clone(),
                Duration::from_secs(interval),
                shutdown_rx,
            );

            println!(
                "{}",
                format!("Ohm dashboard: http://{bind}:{port} (Ctrl-C to stop)").bold()
            );

            let shutdown = async move {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            };
            ohm::web::run_server(monitor, &bind, port, shutdown).await?;
            let _ = refresh_task.await;
        }

        Commands::Status => {
            if !std::path::Path::new(&config.db_path).exists() {
                println!("Database: not initialized");
                println!("\nRun `ohm init` to set up the database.");
                return Ok(());
            }
            let db = ohm::db::open_sqlite(&config.db_path)?;
            ohm::status::show(&db, &config.db_path).await?;
            println!("Mode: {}", config.mode);
            println!(
                "Sources: {}",
                if config.has_real_sources() {
                    "configured".green()
                } else {
                    "none configured (sample data in development mode)".yellow()
                }
            );
        }
    }

    Ok(())
}

/// Console logging plus a plain-text copy appended to `<log_dir>/ohm.log`.
fn init_logging(config: &Config, debug: bool) -> Result<()> {
    let default_filter = if debug { "ohm=debug" } else { "ohm=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory {}", config.log_dir.display()))?;
    let log_path = config.log_dir.join("ohm.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();
    Ok(())
}
