// DataSource trait: the swap-ready abstraction for report ingestion.
//
// Any channel that can produce hazard-related text implements this trait.
// The collector never knows whether it's talking to an HTTP API, a feed
// or the built-in sample data.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{CollectParams, RawReport};

/// Trait for collecting reports from a single source. Implementations are
/// async because most sources are HTTP APIs.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Collect the latest reports from this source.
    async fn collect(&self, params: &CollectParams) -> Result<Vec<RawReport>>;
}
