// Citizen report source: reports submitted by the public through the
// reporting API.
//
// The API returns a JSON array of reports. Reporters pick a hazard type and a
// severity themselves; both are kept as hints for the detector, which still
// reads the free-text description.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use super::client::HttpClient;
use super::models::{CollectParams, RawReport};
use super::traits::DataSource;

pub const SOURCE_NAME: &str = "citizen_report";

pub struct CitizenReportSource {
    client: HttpClient,
    api_url: String,
}

impl CitizenReportSource {
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Wire format of a single citizen report.
#[derive(Debug, Deserialize)]
struct CitizenReport {
    id: String,
    #[serde(rename = "type", default)]
    hazard_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    timestamp: DateTime<Utc>,
}

/// Parse a report timestamp. RFC 3339 is preferred; offset-less ISO 8601
/// (`2024-06-01T10:00:00.123456`) is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

impl From<CitizenReport> for RawReport {
    fn from(r: CitizenReport) -> Self {
        RawReport {
            id: r.id,
            source: SOURCE_NAME.to_string(),
            title: None,
            text: r.description,
            location: r.location,
            latitude: r.latitude,
            longitude: r.longitude,
            timestamp: r.timestamp,
            reported_type: r.hazard_type,
            // Unrecognized severities are dropped rather than failing the batch
            reported_severity: r.severity.and_then(|s| s.parse().ok()),
            author: None,
            url: None,
        }
    }
}

#[async_trait]
impl DataSource for CitizenReportSource {
    async fn collect(&self, params: &CollectParams) -> Result<Vec<RawReport>> {
        info!(url = %self.api_url, "Collecting citizen reports");

        let limit = params.limit.map(|l| l.to_string());
        let since = params.since.map(|s| s.to_rfc3339());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(ref l) = limit {
            query.push(("limit", l));
        }
        if let Some(ref s) = since {
            query.push(("since", s));
        }

        let items: Vec<serde_json::Value> =
            self.client.get_json(&self.api_url, &query, None).await?;
        debug!(count = items.len(), "Citizen reports received");

        // One malformed report is skipped, not the whole batch
        let reports: Vec<RawReport> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<CitizenReport>(item) {
                Ok(report) => Some(RawReport::from(report)),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed citizen report");
                    None
                }
            })
            .collect();

        // The API is expected to honor the query, but filter again in case
        // it ignores unknown parameters.
        Ok(params.apply(reports))
    }
}
