// Built-in sample feeds for development mode.
//
// Each feed stands in for one real channel so the full pipeline (detection,
// dashboard, export) can be exercised without API credentials. Timestamps
// are relative to the moment of collection.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::models::{CollectParams, RawReport};
use super::traits::DataSource;
use crate::detection::models::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFeed {
    CitizenReports,
    SocialMedia,
    NewsFeeds,
    AgencyBulletins,
}

impl SampleFeed {
    pub const ALL: [SampleFeed; 4] = [
        SampleFeed::CitizenReports,
        SampleFeed::SocialMedia,
        SampleFeed::NewsFeeds,
        SampleFeed::AgencyBulletins,
    ];

    /// Registry name used by the collector for this channel.
    pub fn channel_name(&self) -> &'static str {
        match self {
            SampleFeed::CitizenReports => "citizen_reports",
            SampleFeed::SocialMedia => "social_media",
            SampleFeed::NewsFeeds => "news_feeds",
            SampleFeed::AgencyBulletins => "agency_bulletins",
        }
    }
}

pub struct SampleSource {
    feed: SampleFeed,
}

impl SampleSource {
    pub fn new(feed: SampleFeed) -> Self {
        Self { feed }
    }

    /// The feed's reports, timestamped relative to `now`.
    pub fn reports_at(&self, now: DateTime<Utc>) -> Vec<RawReport> {
        match self.feed {
            SampleFeed::CitizenReports => citizen_reports(now),
            SampleFeed::SocialMedia => social_posts(now),
            SampleFeed::NewsFeeds => news_articles(now),
            SampleFeed::AgencyBulletins => agency_bulletins(now),
        }
    }
}

#[async_trait]
impl DataSource for SampleSource {
    async fn collect(&self, params: &CollectParams) -> Result<Vec<RawReport>> {
        info!(feed = self.feed.channel_name(), "Collecting sample data");
        Ok(params.apply(self.reports_at(Utc::now())))
    }
}

fn report(
    id: &str,
    source: &str,
    text: &str,
    location: &str,
    coords: Option<(f64, f64)>,
    timestamp: DateTime<Utc>,
) -> RawReport {
    let mut r = RawReport::new(id, source, text);
    r.location = Some(location.to_string());
    if let Some((lat, lon)) = coords {
        r.latitude = Some(lat);
        r.longitude = Some(lon);
    }
    r.timestamp = timestamp;
    r
}

fn citizen_reports(now: DateTime<Utc>) -> Vec<RawReport> {
    let mut flood = report(
        "report_1",
        "citizen_report",
        "Major flooding near the pier",
        "Coastal City A",
        Some((34.0522, -118.2437)),
        now,
    );
    flood.reported_type = Some("flood".to_string());
    flood.reported_severity = Some(Severity::High);

    let mut surge = report(
        "report_2",
        "citizen_report",
        "Waves reaching the boardwalk",
        "Beach Town B",
        Some((36.7783, -119.4179)),
        now - Duration::hours(1),
    );
    surge.reported_type = Some("storm_surge".to_string());
    surge.reported_severity = Some(Severity::Medium);

    vec![flood, surge]
}

fn social_posts(now: DateTime<Utc>) -> Vec<RawReport> {
    let mut waves = report(
        "tweet_1",
        "twitter",
        "The waves are getting dangerously high at Coastal City beach! #oceanhazard #flooding",
        "Coastal City",
        Some((34.0522, -118.2437)),
        now - Duration::minutes(30),
    );
    waves.author = Some("@concerned_citizen".to_string());

    let mut alert = report(
        "tweet_2",
        "twitter",
        "Just heard a weather alert about potential storm surge in the area. Stay safe everyone!",
        "Beach Town",
        Some((36.7783, -119.4179)),
        now - Duration::hours(2),
    );
    alert.author = Some("@local_weather".to_string());

    vec![waves, alert]
}

fn news_articles(now: DateTime<Utc>) -> Vec<RawReport> {
    let mut article = report(
        "news_1",
        "Coastal News Network",
        "Local authorities are issuing warnings and preparing emergency response teams as a tropical storm approaches the coast.",
        "Regional Coast",
        None,
        now - Duration::hours(4),
    );
    article.title = Some("Coastal Communities Prepare for Upcoming Storm".to_string());
    article.url = Some("https://example-news.com/storm-warning".to_string());
    vec![article]
}

fn agency_bulletins(now: DateTime<Utc>) -> Vec<RawReport> {
    vec![
        report(
            "bulletin_1",
            "official_alert",
            "Storm surge warning issued for Beach Town. Expect waves up to 8 feet.",
            "Beach Town",
            Some((36.7783, -119.4179)),
            now - Duration::minutes(30),
        ),
        report(
            "bulletin_2",
            "lifeguard_report",
            "High waves observed at Seaside Village. Caution advised for swimmers.",
            "Seaside Village",
            Some((38.8951, -77.0364)),
            now - Duration::hours(1),
        ),
        report(
            "bulletin_3",
            "environmental_agency",
            "Coastal erosion worsening at Point Break. Several feet of beach lost this season.",
            "Point Break",
            Some((40.7128, -74.0060)),
            now - Duration::hours(2),
        ),
        report(
            "bulletin_4",
            "national_weather_service",
            "Tropical storm approaching the gulf coast. Evacuation orders in effect for low-lying areas.",
            "Gulf Coast City",
            Some((29.7604, -95.3698)),
            now - Duration::hours(3),
        ),
    ]
}
