use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracker_core::{EntityId, EntityReport, Metric, MetricChanges, Result, Series, Window};

use crate::colors::Color;
use crate::format::metric_label;

/// One plotted observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub value:     u64,
}

/// One panel of a chart: a single metric over the selected period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub label:  &'static str,
    /// `#rrggbb` line colour.
    pub color:  String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn from_series(series: &Series, metric: Metric) -> Self {
        Self {
            metric,
            label:  metric_label(metric),
            color:  Color::for_metric(metric).to_hex(),
            points: series
                .iter()
                .map(|s| ChartPoint { timestamp: s.timestamp, value: s.value(metric) })
                .collect(),
        }
    }
}

/// Renderable form of one entity's report: three stacked panels sharing the
/// time axis, plus the raw day/week changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub entity:  EntityId,
    pub window:  Window,
    pub series:  Vec<ChartSeries>,
    pub changes: BTreeMap<Metric, MetricChanges>,
}

impl Chart {
    pub fn from_report(report: &EntityReport) -> Self {
        Self {
            entity:  report.entity.clone(),
            window:  report.window,
            series:  Metric::ALL
                .into_iter()
                .map(|m| ChartSeries::from_series(&report.period, m))
                .collect(),
            changes: report.changes.clone(),
        }
    }
}

/// Write `charts` as pretty-printed JSON for external plotting tools.
///
/// Failures surface as [`tracker_core::TrackerError::Io`].
pub fn write_json<W: Write>(charts: &[Chart], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, charts).map_err(io::Error::from)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tracker_core::{Anchor, Sample, TrackerError};

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn report() -> EntityReport {
        let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let series = Series::new(vec![
            Sample::new(t0, 100, 1_000, 5),
            Sample::new(t0 + chrono::Duration::days(1), 110, 1_500, 6),
        ])
        .unwrap();
        EntityReport::build("UCchart".into(), &series, Window::All, Anchor::WallClock, t0)
    }

    #[test]
    fn one_panel_per_metric_in_order() {
        let chart = Chart::from_report(&report());
        let labels: Vec<&str> = chart.series.iter().map(|s| s.label).collect();
        assert_eq!(labels, ["Subscribers", "Views", "Videos"]);
        assert_eq!(chart.series[1].color, "#3498db");

        let views: Vec<u64> = chart.series[1].points.iter().map(|p| p.value).collect();
        assert_eq!(views, [1_000, 1_500]);
    }

    #[test]
    fn json_export_carries_changes_and_points() {
        let mut buf = Vec::new();
        write_json(&[Chart::from_report(&report())], &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        let chart = &json[0];
        assert_eq!(chart["entity"], "UCchart");
        assert_eq!(chart["window"], "all");
        assert_eq!(chart["series"][0]["metric"], "subscribers");
        assert_eq!(chart["series"][0]["points"][1]["value"], 110);
        assert_eq!(chart["changes"]["subscribers"]["daily"]["absolute_change"], 10);
        assert_eq!(chart["changes"]["subscribers"]["daily"]["percent_change"], 10.0);
        assert!(chart["changes"]["subscribers"]["weekly"]["absolute_change"].is_null());
    }

    #[test]
    fn write_failure_is_an_io_error() {
        let err = write_json(&[Chart::from_report(&report())], BrokenPipe).unwrap_err();
        match err {
            TrackerError::Io { source } => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
