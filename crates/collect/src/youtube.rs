//! YouTube Data API v3 client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use tracker_config::CollectConfig;
use tracker_core::{EntityId, Result, TrackerError};

use crate::source::{ChannelStats, MetricSource};

/// [`MetricSource`] backed by the `channels` endpoint of the YouTube Data API.
pub struct YouTubeSource {
    http:    reqwest::Client,
    base:    String,
    api_key: String,
}

impl YouTubeSource {
    pub fn new(base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http:    reqwest::Client::new(),
            base:    base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from config, reading the API key from the environment.
    pub fn from_config(cfg: &CollectConfig) -> Result<Self> {
        Ok(Self::new(&cfg.api_base, cfg.api_key()?))
    }

    async fn channels(&self, query: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}/channels", self.base);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?;

        resp.text().await.map_err(http_error)
    }
}

#[async_trait]
impl MetricSource for YouTubeSource {
    async fn resolve(&self, handle: &str) -> Result<Option<EntityId>> {
        let handle = handle.trim().trim_start_matches('@');
        let body = self.channels(&[("part", "id"), ("forHandle", handle)]).await?;
        let id = parse_channel_id(&body)?;
        debug!(handle, ?id, "resolved handle");
        Ok(id)
    }

    async fn fetch(&self, channel: &EntityId) -> Result<Option<ChannelStats>> {
        let body = self
            .channels(&[("part", "statistics,snippet"), ("id", channel.as_str())])
            .await?;
        parse_stats(channel, &body)
    }
}

/// The request URL carries the API key, so it is stripped from errors.
fn http_error(e: reqwest::Error) -> TrackerError {
    TrackerError::Source(format!("YouTube API request failed: {}", e.without_url()))
}

// ── Response shapes ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: Option<Snippet>,
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

/// Counts arrive as decimal strings; absent counts are treated as zero.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Statistics {
    subscriber_count:        Option<String>,
    view_count:              Option<String>,
    video_count:             Option<String>,
    hidden_subscriber_count: bool,
}

fn parse_list(body: &str) -> Result<ListResponse> {
    serde_json::from_str(body)
        .map_err(|e| TrackerError::Source(format!("unexpected API response: {e}")))
}

fn parse_count(field: &str, raw: Option<&str>) -> Result<u64> {
    match raw {
        None => Ok(0),
        Some(s) => s
            .parse()
            .map_err(|_| TrackerError::Source(format!("{field} is not a count: '{s}'"))),
    }
}

/// Channel ID from a `part=id` response, `None` if nothing matched.
pub fn parse_channel_id(body: &str) -> Result<Option<EntityId>> {
    Ok(parse_list(body)?
        .items
        .into_iter()
        .next()
        .map(|item| EntityId::new(item.id)))
}

/// Statistics from a `part=statistics,snippet` response.
pub fn parse_stats(channel: &EntityId, body: &str) -> Result<Option<ChannelStats>> {
    let Some(item) = parse_list(body)?.items.into_iter().next() else {
        return Ok(None);
    };
    let stats = item.statistics.unwrap_or_default();

    Ok(Some(ChannelStats {
        channel_id:         if item.id.is_empty() { channel.clone() } else { EntityId::new(item.id) },
        title:              item.snippet.map(|s| s.title).unwrap_or_default(),
        subscriber_count:   parse_count("subscriberCount", stats.subscriber_count.as_deref())?,
        view_count:         parse_count("viewCount", stats.view_count.as_deref())?,
        video_count:        parse_count("videoCount", stats.video_count.as_deref())?,
        hidden_subscribers: stats.hidden_subscriber_count,
    }))
}
