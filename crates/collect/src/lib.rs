//! Collection job: sample every configured channel once and append the result.

pub mod source;
pub mod youtube;

pub use source::{ChannelStats, MetricSource};
pub use youtube::YouTubeSource;

use chrono::{DateTime, SubsecRound, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};
use tracker_config::ChannelConfig;
use tracker_core::{EntityId, Result, SampleSink, TrackerError};

/// Outcome of one collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    /// Channels that got a new sample.
    pub stored: Vec<EntityId>,
    /// `(handle, reason)` for every channel that was skipped.
    pub failed: Vec<(String, String)>,
}

impl CollectSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sample each channel once and append one record per channel to `sink`.
///
/// Every record of a run is stamped with `now`, truncated to whole seconds.
/// A failing channel is logged and skipped; the run always continues. Handles
/// that resolve to a channel already sampled in this run are skipped too, so
/// each channel gets at most one record per run.
pub async fn collect_once(
    source:   &dyn MetricSource,
    sink:     &dyn SampleSink,
    channels: &[ChannelConfig],
    now:      DateTime<Utc>,
) -> CollectSummary {
    let at = now.trunc_subsecs(0);
    let mut summary = CollectSummary::default();

    if channels.is_empty() {
        warn!("No channels configured; nothing to collect");
        return summary;
    }

    info!("Collecting {} channel(s)", channels.len());

    let mut sampled = HashSet::new();
    for channel in channels {
        match collect_channel(source, sink, channel, at, &mut sampled).await {
            Ok(id) => summary.stored.push(id),
            Err(e) => {
                warn!("{}: {e}", channel.display_name());
                summary.failed.push((channel.handle.clone(), e.to_string()));
            }
        }
    }

    info!(
        stored = summary.stored.len(),
        failed = summary.failed.len(),
        "Collection finished"
    );
    summary
}

async fn collect_channel(
    source:  &dyn MetricSource,
    sink:    &dyn SampleSink,
    channel: &ChannelConfig,
    at:      DateTime<Utc>,
    sampled: &mut HashSet<EntityId>,
) -> Result<EntityId> {
    let id = source
        .resolve(&channel.handle)
        .await?
        .ok_or_else(|| TrackerError::Source(format!("no channel for handle '{}'", channel.handle)))?;

    if sampled.contains(&id) {
        return Err(TrackerError::Source(format!("channel {id} was already sampled in this run")));
    }

    let stats = source
        .fetch(&id)
        .await?
        .ok_or_else(|| TrackerError::Source(format!("channel {id} not found")))?;

    if stats.hidden_subscribers {
        warn!("{}: subscriber count is hidden", channel.display_name());
    }

    sink.append(&id, &stats.to_sample(at))?;
    sampled.insert(id.clone());
    info!(
        channel = %id,
        subscribers = stats.subscriber_count,
        views = stats.view_count,
        videos = stats.video_count,
        "{} sampled",
        channel.display_name()
    );
    Ok(id)
}

/// Spawn a background Tokio task that runs [`collect_once`] every `interval`
/// (first run immediately) and forwards each [`CollectSummary`] through the
/// returned channel.
///
/// The task stops automatically when the receiver is dropped.
pub fn spawn_collector(
    source:   Arc<dyn MetricSource>,
    sink:     Arc<dyn SampleSink>,
    channels: Vec<ChannelConfig>,
    interval: Duration,
) -> mpsc::Receiver<CollectSummary> {
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let summary = collect_once(source.as_ref(), sink.as_ref(), &channels, Utc::now()).await;

            if tx.send(summary).await.is_err() {
                break; // all receivers dropped
            }
        }
    });

    rx
}
