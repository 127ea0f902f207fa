use std::fmt::Write;
use tracker_core::{Coverage, EntityReport, Metric};

use crate::colors::Color;
use crate::format::{format_change, format_count, metric_label};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Text dashboard settings.
#[derive(Debug, Clone, Copy)]
pub struct DashboardStyle {
    /// Emit ANSI colour escapes.
    pub color:       bool,
    /// Maximum sparkline width in characters; `0` hides sparklines.
    pub spark_width: usize,
}

impl Default for DashboardStyle {
    fn default() -> Self {
        Self { color: false, spark_width: 30 }
    }
}

/// Render one entity's report as a plain-text block.
pub fn render(report: &EntityReport, style: DashboardStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Channel: {}  (period: {})", report.entity, report.window);

    let Some(latest) = report.latest else {
        let _ = writeln!(out, "  no data yet");
        return out;
    };

    for metric in Metric::ALL {
        let changes = report.changes_for(metric);
        let label = format!("{:<12}", metric_label(metric));
        let label = if style.color { Color::for_metric(metric).paint(&label) } else { label };

        let _ = writeln!(
            out,
            "  {label}{:>16}   day: {:<24} week: {}",
            format_count(latest.value(metric)),
            format_change(&changes.daily),
            format_change(&changes.weekly),
        );

        if style.spark_width > 0 && report.coverage == Coverage::Samples {
            let values: Vec<u64> = report.period.values(metric).collect();
            let _ = writeln!(out, "  {:<12}{}", "", sparkline(&values, style.spark_width));
        }
    }

    match report.coverage {
        Coverage::Samples => {
            let first = report.period.as_slice()[0].timestamp;
            let _ = writeln!(
                out,
                "  {} sample(s) in period, {} → {} UTC",
                report.period.len(),
                first.format(TIME_FORMAT),
                latest.timestamp.format(TIME_FORMAT),
            );
        }
        Coverage::EmptyPeriod => {
            let _ = writeln!(
                out,
                "  no data in selected period (last sample {} UTC)",
                latest.timestamp.format(TIME_FORMAT),
            );
        }
        Coverage::NeverSampled => {}
    }

    out
}

/// Unicode block sparkline of the newest `width` values, scaled between their
/// minimum and maximum. A flat series renders at the lowest level.
pub fn sparkline(values: &[u64], width: usize) -> String {
    let tail = &values[values.len().saturating_sub(width)..];
    let (Some(&min), Some(&max)) = (tail.iter().min(), tail.iter().max()) else {
        return String::new();
    };
    let span = (max - min) as f64;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    tail.iter()
        .map(|&v| {
            let level = if span == 0.0 { 0.0 } else { (v - min) as f64 / span * top };
            SPARK_LEVELS[level.round() as usize]
        })
        .collect()
}
