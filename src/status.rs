// System status display: DB stats, stored report counts, last refresh.

use anyhow::Result;
use std::sync::Arc;

use crate::db::Database;
use crate::monitor::refresh::LAST_REFRESH_KEY;

/// Display system status to the terminal. The database must already exist.
pub async fn show(db: &Arc<dyn Database>, db_display_path: &str) -> Result<()> {
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let counts = db.report_counts().await?;
    println!(
        "Stored reports: {} total ({} high, {} medium, {} low, {} unknown)",
        counts.total, counts.high, counts.medium, counts.low, counts.unknown
    );

    match db.get_scan_state(LAST_REFRESH_KEY).await? {
        Some(at) => println!("Last refresh: {at}"),
        None => {
            println!("Last refresh: never");
            println!("  Run `ohm serve` to start monitoring");
        }
    }

    let runs = db.get_recent_runs(5).await?;
    if !runs.is_empty() {
        println!("Recent runs:");
        for run in &runs {
            println!(
                "  {} collected {}, {} hazards, {} source errors",
                run.started_at, run.collected, run.hazards, run.errors
            );
            if let Some(ref err) = run.error {
                println!("    {}", crate::output::truncate_chars(err, 100));
            }
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_byte_sizes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
