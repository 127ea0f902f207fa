//! Presentation adapter: turns [`tracker_core::EntityReport`]s into chart
//! data and human-readable text. All number formatting lives here.

pub mod chart;
pub mod colors;
pub mod dashboard;
pub mod format;

pub use chart::{Chart, ChartPoint, ChartSeries};
pub use colors::Color;
pub use dashboard::{render, DashboardStyle};
pub use format::{format_change, format_count, group_thousands, metric_label};
