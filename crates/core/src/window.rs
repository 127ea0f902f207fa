use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::TrackerError;
use crate::sample::Series;

/// How far back a displayed period reaches.
///
/// `LastDays(0)` means "no restriction" and compares equal to `All`.
/// The named presets are a convenience; any day count is accepted.
#[derive(Debug, Clone, Copy, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Window {
    #[default]
    All,
    LastDays(u32),
}

impl Window {
    pub const WEEK:    Self = Window::LastDays(7);
    pub const MONTH:   Self = Window::LastDays(30);
    pub const QUARTER: Self = Window::LastDays(90);

    /// Windows offered by the dashboard period selector.
    pub const PRESETS: [Window; 4] = [Window::All, Window::WEEK, Window::MONTH, Window::QUARTER];

    /// Window covering the last `days` days; `0` gives [`Window::All`].
    pub fn new(days: u32) -> Self {
        if days == 0 { Window::All } else { Window::LastDays(days) }
    }

    /// Day count of the window, `None` when unrestricted.
    pub fn days(self) -> Option<u32> {
        match self {
            Window::All | Window::LastDays(0) => None,
            Window::LastDays(n) => Some(n),
        }
    }

    /// Inclusive lower bound for `now`.
    ///
    /// `None` when unrestricted, or when the cutoff would fall before the
    /// earliest representable instant (every sample then qualifies).
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = self.days()?;
        now.checked_sub_signed(Duration::days(i64::from(days)))
    }
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.days() == other.days()
    }
}

impl Hash for Window {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.days().hash(state);
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days() {
            None    => f.write_str("all"),
            Some(n) => write!(f, "{n}d"),
        }
    }
}

impl FromStr for Window {
    type Err = TrackerError;

    /// Accepts `all`, a bare day count (`30`) or a day count with a `d`
    /// suffix (`30d`). `0` parses as [`Window::All`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Window::All);
        }
        let digits = s.strip_suffix(['d', 'D']).unwrap_or(s);
        match digits.parse::<u32>() {
            Ok(n)  => Ok(Window::new(n)),
            Err(_) => Err(TrackerError::Config(format!("invalid period '{s}' (expected 'all' or a day count)"))),
        }
    }
}

impl TryFrom<String> for Window {
    type Error = TrackerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Window> for String {
    fn from(w: Window) -> Self {
        w.to_string()
    }
}

/// Filter `series` to `window`, measured back from the current wall-clock time.
pub fn filter(series: &Series, window: Window) -> Series {
    filter_at(series, window, Utc::now())
}

/// Filter `series` to the samples with `timestamp >= now - window`.
///
/// The series is ordered, so the result is always a contiguous suffix: this
/// never reorders or deduplicates. An empty result means "no data in
/// period", which is distinct from an empty input.
pub fn filter_at(series: &Series, window: Window, now: DateTime<Utc>) -> Series {
    let Some(cutoff) = window.cutoff(now) else {
        return series.clone();
    };
    let start = series.as_slice().partition_point(|s| s.timestamp < cutoff);
    series.suffix(start)
}
