pub mod collect;
pub mod report;
pub mod watch;

use std::io::IsTerminal;
use tracker_config::TrackerConfig;
use tracker_core::{Anchor, Window};
use tracker_render::DashboardStyle;

/// Presentation settings shared by `report` and `watch`: CLI flags override
/// the `[report]` table.
pub struct View {
    pub window: Window,
    pub anchor: Anchor,
    pub style:  DashboardStyle,
}

impl View {
    pub fn new(
        config: &TrackerConfig,
        period: Option<Window>,
        anchor: Option<Anchor>,
        color:  bool,
    ) -> Self {
        Self {
            window: period.unwrap_or(config.report.period),
            anchor: anchor.unwrap_or(config.report.anchor),
            style:  DashboardStyle {
                color: color && std::io::stdout().is_terminal(),
                ..DashboardStyle::default()
            },
        }
    }
}
