use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::{Result, TrackerError};

/// Opaque identifier of a tracked entity (a channel ID in practice).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One timestamped observation of the three tracked metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub timestamp:        DateTime<Utc>,
    pub subscriber_count: u64,
    pub view_count:       u64,
    pub video_count:      u64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, subscriber_count: u64, view_count: u64, video_count: u64) -> Self {
        Self { timestamp, subscriber_count, view_count, video_count }
    }

    /// Read a single metric through its tag.
    #[inline]
    #[must_use]
    pub fn value(&self, metric: Metric) -> u64 {
        metric.value(self)
    }
}

/// The tracked metrics. Every per-metric computation goes through this tag
/// instead of being written out once per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Subscribers,
    Views,
    Videos,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Subscribers, Metric::Views, Metric::Videos];

    #[inline]
    pub fn value(self, sample: &Sample) -> u64 {
        match self {
            Metric::Subscribers => sample.subscriber_count,
            Metric::Views       => sample.view_count,
            Metric::Videos      => sample.video_count,
        }
    }

    /// Column name used in the persisted record header.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Subscribers => "subscriber_count",
            Metric::Views       => "view_count",
            Metric::Videos      => "video_count",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// The ordered history of samples for one entity.
///
/// Timestamps are non-decreasing; equal timestamps keep their append order.
/// The ordering is checked once at construction, so every operation on a
/// `Series` can rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Build a series from samples already in timestamp order.
    ///
    /// Returns [`TrackerError::Unordered`] if any sample is older than its
    /// predecessor. Callers holding unsorted data should use
    /// [`Series::from_unsorted`].
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if let Some(index) = samples
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(TrackerError::Unordered { index: index + 1 });
        }
        Ok(Self { samples })
    }

    /// Build a series by stable-sorting on timestamp, so ties keep read order.
    pub fn from_unsorted(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Most recent sample, if any.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Values of one metric, oldest first.
    pub fn values(&self, metric: Metric) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().map(move |s| metric.value(s))
    }

    /// Copy of the suffix starting at `start`. Suffixes of an ordered series
    /// are ordered, so no re-check is needed.
    pub(crate) fn suffix(&self, start: usize) -> Self {
        Self { samples: self.samples[start..].to_vec() }
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
