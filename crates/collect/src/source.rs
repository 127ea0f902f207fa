use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracker_core::{EntityId, Result, Sample};

/// Current statistics of one channel as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStats {
    pub channel_id:       EntityId,
    pub title:            String,
    pub subscriber_count: u64,
    pub view_count:       u64,
    pub video_count:      u64,
    /// The channel hides its subscriber count; `subscriber_count` is then
    /// whatever upstream reports (usually 0).
    pub hidden_subscribers: bool,
}

impl ChannelStats {
    /// Turn the statistics into a sample stamped at `at`.
    pub fn to_sample(&self, at: DateTime<Utc>) -> Sample {
        Sample::new(at, self.subscriber_count, self.view_count, self.video_count)
    }
}

/// Upstream provider of current metric values.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Resolve a handle (`@name` or `name`) to a channel ID.
    /// `Ok(None)` when no channel has that handle.
    async fn resolve(&self, handle: &str) -> Result<Option<EntityId>>;

    /// Fetch current statistics. `Ok(None)` when the channel does not exist.
    async fn fetch(&self, channel: &EntityId) -> Result<Option<ChannelStats>>;
}
