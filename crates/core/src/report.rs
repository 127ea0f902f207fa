use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::delta::{compute_changes, MetricChanges};
use crate::error::TrackerError;
use crate::sample::{EntityId, Metric, Sample, Series};
use crate::window::{filter_at, Window};

/// What "now" means when measuring a period window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// The moment of the query. A dashboard viewed long after the last
    /// collection run may therefore show an empty recent period.
    #[default]
    WallClock,
    /// The timestamp of the entity's newest sample.
    LatestSample,
}

impl Anchor {
    /// Resolve the anchor for `series` given the current time.
    pub fn resolve(self, series: &Series, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Anchor::WallClock    => now,
            Anchor::LatestSample => series.latest().map_or(now, |s| s.timestamp),
        }
    }
}

impl FromStr for Anchor {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall-clock" | "now"       => Ok(Anchor::WallClock),
            "latest-sample" | "latest" => Ok(Anchor::LatestSample),
            other => Err(TrackerError::Config(format!(
                "invalid anchor '{other}' (expected 'wall-clock' or 'latest-sample')"
            ))),
        }
    }
}

/// How much data an entity has for the selected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    /// The entity has no persisted samples at all.
    NeverSampled,
    /// The entity has history, but none of it falls inside the window.
    EmptyPeriod,
    /// The window contains at least one sample.
    Samples,
}

/// Everything the presentation layer needs for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub entity:   EntityId,
    pub window:   Window,
    pub coverage: Coverage,
    /// Samples inside the window, for charting.
    pub period:   Series,
    /// Newest sample of the full history.
    pub latest:   Option<Sample>,
    /// Daily/weekly changes over the full history, independent of `window`.
    pub changes:  BTreeMap<Metric, MetricChanges>,
}

impl EntityReport {
    /// Assemble the report for `entity` from its full history.
    ///
    /// Filtering and delta computation both read `full`; only the chart data
    /// is narrowed to the window.
    pub fn build(entity: EntityId, full: &Series, window: Window, anchor: Anchor, now: DateTime<Utc>) -> Self {
        let period = filter_at(full, window, anchor.resolve(full, now));

        let coverage = if full.is_empty() {
            Coverage::NeverSampled
        } else if period.is_empty() {
            Coverage::EmptyPeriod
        } else {
            Coverage::Samples
        };

        Self {
            entity,
            window,
            coverage,
            period,
            latest: full.latest().copied(),
            changes: compute_changes(full),
        }
    }

    /// Changes for one metric. Every metric is always present.
    pub fn changes_for(&self, metric: Metric) -> MetricChanges {
        self.changes.get(&metric).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::ChangeMetric;
    use crate::sample::fixtures::{daily, day};

    #[test]
    fn never_sampled_is_distinct_from_empty_period() {
        let none = EntityReport::build("a".into(), &Series::empty(), Window::WEEK, Anchor::WallClock, day(20));
        assert_eq!(none.coverage, Coverage::NeverSampled);
        assert!(none.latest.is_none());

        let old = EntityReport::build("a".into(), &daily(&[1, 2]), Window::WEEK, Anchor::WallClock, day(20));
        assert_eq!(old.coverage, Coverage::EmptyPeriod);
        assert!(old.latest.is_some());
    }

    #[test]
    fn period_filter_does_not_change_deltas() {
        let full = daily(&[10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
        let all  = EntityReport::build("a".into(), &full, Window::All, Anchor::WallClock, day(10));
        let week = EntityReport::build("a".into(), &full, Window::LastDays(2), Anchor::WallClock, day(10));

        assert_eq!(week.period.len(), 3);
        assert_eq!(all.changes, week.changes);
        assert_eq!(week.changes_for(Metric::Subscribers).weekly.absolute_change, Some(7));
    }

    #[test]
    fn latest_sample_anchor_ignores_wall_clock() {
        let full = daily(&[1, 2, 3, 4, 5]);
        let late = day(28);

        let wall = EntityReport::build("a".into(), &full, Window::WEEK, Anchor::WallClock, late);
        assert_eq!(wall.coverage, Coverage::EmptyPeriod);

        let anchored = EntityReport::build("a".into(), &full, Window::WEEK, Anchor::LatestSample, late);
        assert_eq!(anchored.coverage, Coverage::Samples);
        assert_eq!(anchored.period.len(), 5);
    }

    #[test]
    fn short_history_reports_insufficient() {
        let r = EntityReport::build("a".into(), &daily(&[5]), Window::All, Anchor::WallClock, day(2));
        assert_eq!(r.changes_for(Metric::Views).daily, ChangeMetric::INSUFFICIENT);
    }

    #[test]
    fn parses_anchor() {
        assert_eq!("wall-clock".parse::<Anchor>().unwrap(), Anchor::WallClock);
        assert_eq!("Latest".parse::<Anchor>().unwrap(), Anchor::LatestSample);
        assert!("yesterday".parse::<Anchor>().is_err());
    }
}
