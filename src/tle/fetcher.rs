//! TLE fetching functionality

use anyhow::{Result, bail};
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// Known CelesTrak groups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CelestrakGroup {
    Stations,
    Starlink,
    GpsOps,
    Weather,
    Science,
    Engineering,
    Amateur,
}

impl CelestrakGroup {
    pub const ALL: [CelestrakGroup; 7] = [
        CelestrakGroup::Stations,
        CelestrakGroup::Starlink,
        CelestrakGroup::GpsOps,
        CelestrakGroup::Weather,
        CelestrakGroup::Science,
        CelestrakGroup::Engineering,
        CelestrakGroup::Amateur,
    ];

    /// Value of the `GROUP` query parameter
    pub fn query_name(self) -> &'static str {
        match self {
            CelestrakGroup::Stations => "stations",
            CelestrakGroup::Starlink => "starlink",
            CelestrakGroup::GpsOps => "gps-ops",
            CelestrakGroup::Weather => "weather",
            CelestrakGroup::Science => "science",
            CelestrakGroup::Engineering => "engineering",
            CelestrakGroup::Amateur => "amateur",
        }
    }

    pub fn from_query_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.query_name() == name)
    }
}

/// Anything that can hand back the raw text payload of a named group
pub trait GroupSource {
    fn fetch_group(&self, group: &str) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP source backed by the CelesTrak GP endpoint
pub struct CelestrakFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl CelestrakFetcher {
    /// Build a fetcher whose requests each give up after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn group_url(&self, group: &str) -> String {
        format!("{}?GROUP={}&FORMAT=tle", self.base_url, group)
    }
}

impl GroupSource for CelestrakFetcher {
    async fn fetch_group(&self, group: &str) -> Result<String> {
        let url = self.group_url(group);
        let resp = self
            .client
            .get(&url)
            .header("accept", "text/plain")
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        info!(
            "[TLE GROUP FETCH] group={} status={} url={} bytes={}",
            group,
            status,
            url,
            body.len()
        );
        if !status.is_success() {
            bail!("HTTP {} for group {}", status, group);
        }
        check_payload(group, &body)?;
        Ok(body)
    }
}

/// Reject bodies that cannot possibly contain element records
fn check_payload(group: &str, body: &str) -> Result<()> {
    let trimmed = body.trim_start_matches('\u{feff}').trim_start();
    if trimmed.is_empty() {
        bail!("empty payload for group {}", group);
    }
    if trimmed.starts_with('<') {
        let sample: String = trimmed.lines().take(3).collect::<Vec<_>>().join("\\n");
        bail!("HTML payload for group {}. Sample: {}", group, sample);
    }
    Ok(())
}
