//! Day-over-day / week-over-week change computation.
//!
//! Offsets count *sample positions*, not elapsed time: "daily" compares the
//! latest sample with the one directly before it, "weekly" with the one seven
//! positions back. Cadence is assumed to be roughly one sample per day and is
//! not validated.
//!
//! Deltas are always taken over the full, unfiltered series. A display period
//! narrowing the chart never changes them.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::sample::{Metric, Sample, Series};

/// Look-back distance in sample positions. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset(usize);

impl Offset {
    pub const DAILY:  Self = Offset(1);
    pub const WEEKLY: Self = Offset(7);

    /// `None` for zero: comparing a sample with itself is meaningless.
    pub fn new(samples: usize) -> Option<Self> {
        (samples > 0).then_some(Offset(samples))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

/// A percentage rounded to two decimal places, stored exactly as an integer
/// number of hundredths (`10.25%` is `1025`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(i64);

impl Percent {
    pub const ZERO: Self = Percent(0);

    pub fn from_hundredths(hundredths: i64) -> Self {
        Percent(hundredths)
    }

    pub fn hundredths(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `change / base * 100`, rounded half away from zero at the second
    /// decimal place. Pure integer arithmetic, so `.xx5` boundaries are exact.
    ///
    /// `base` must be non-zero.
    fn ratio(change: i128, base: u64) -> Self {
        let den = i128::from(base);
        let num = change * 10_000;
        let mut q = num / den;
        let r = num % den;
        if 2 * r.abs() >= den {
            q += num.signum();
        }
        Percent(saturate(q))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Change of one metric against one offset.
///
/// Both fields are `None` together when the series is too short; that means
/// "insufficient history" and must never be read as a zero change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChangeMetric {
    pub absolute_change: Option<i64>,
    pub percent_change:  Option<Percent>,
}

impl ChangeMetric {
    pub const INSUFFICIENT: Self = ChangeMetric { absolute_change: None, percent_change: None };

    pub fn is_available(&self) -> bool {
        self.absolute_change.is_some()
    }
}

/// Daily and weekly change for a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricChanges {
    pub daily:  ChangeMetric,
    pub weekly: ChangeMetric,
}

/// Change of `metric` between the latest sample and the one `offset`
/// positions before it.
pub fn compute_change(series: &Series, metric: Metric, offset: Offset) -> ChangeMetric {
    change_by(series.as_slice(), offset, |s| metric.value(s))
}

/// Generic form of [`compute_change`] over any metric accessor.
///
/// A change is available iff `len >= offset + 1`.
pub fn change_by<F>(samples: &[Sample], offset: Offset, value: F) -> ChangeMetric
where
    F: Fn(&Sample) -> u64,
{
    let len = samples.len();
    if len <= offset.get() {
        return ChangeMetric::INSUFFICIENT;
    }

    let current  = value(&samples[len - 1]);
    let previous = value(&samples[len - 1 - offset.get()]);
    let change   = i128::from(current) - i128::from(previous);

    // Zero baseline: growth from nothing has no rate; report 0.
    let percent = if previous == 0 {
        Percent::ZERO
    } else {
        Percent::ratio(change, previous)
    };

    ChangeMetric {
        absolute_change: Some(saturate(change)),
        percent_change:  Some(percent),
    }
}

/// Daily and weekly changes for every tracked metric: six independent values.
pub fn compute_changes(series: &Series) -> BTreeMap<Metric, MetricChanges> {
    Metric::ALL
        .into_iter()
        .map(|metric| {
            let changes = MetricChanges {
                daily:  compute_change(series, metric, Offset::DAILY),
                weekly: compute_change(series, metric, Offset::WEEKLY),
            };
            (metric, changes)
        })
        .collect()
}

/// Counts are `u64`; differences beyond `i64` are clamped.
fn saturate(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::fixtures::{daily, day};

    fn subs(series: &Series, offset: Offset) -> ChangeMetric {
        compute_change(series, Metric::Subscribers, offset)
    }

    #[test]
    fn ten_percent_daily_growth() {
        let c = subs(&daily(&[100, 110]), Offset::DAILY);
        assert_eq!(c.absolute_change, Some(10));
        assert_eq!(c.percent_change, Some(Percent::from_hundredths(1000)));
        assert_eq!(c.percent_change.unwrap().to_string(), "10.00");
    }

    #[test]
    fn zero_baseline_reports_zero_percent() {
        let c = subs(&daily(&[0, 5]), Offset::DAILY);
        assert_eq!(c.absolute_change, Some(5));
        assert_eq!(c.percent_change, Some(Percent::ZERO));
    }

    #[test]
    fn short_series_is_insufficient_not_zero() {
        let c = subs(&daily(&[1, 2, 3, 4, 5]), Offset::WEEKLY);
        assert_eq!(c, ChangeMetric::INSUFFICIENT);
        assert!(!c.is_available());
    }

    #[test]
    fn weekly_boundary_needs_offset_plus_one_samples() {
        let seven = daily(&[10, 11, 12, 13, 14, 15, 16]);
        assert_eq!(subs(&seven, Offset::WEEKLY), ChangeMetric::INSUFFICIENT);

        let eight = daily(&[10, 11, 12, 13, 14, 15, 16, 20]);
        let c = subs(&eight, Offset::WEEKLY);
        assert_eq!(c.absolute_change, Some(10));
        assert_eq!(c.percent_change, Some(Percent::from_hundredths(10_000)));
    }

    #[test]
    fn daily_boundary() {
        assert_eq!(subs(&daily(&[7]), Offset::DAILY), ChangeMetric::INSUFFICIENT);
        assert_eq!(subs(&Series::empty(), Offset::DAILY), ChangeMetric::INSUFFICIENT);
    }

    #[test]
    fn decrease_is_negative() {
        let c = subs(&daily(&[200, 190]), Offset::DAILY);
        assert_eq!(c.absolute_change, Some(-10));
        assert_eq!(c.percent_change.unwrap().to_string(), "-5.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 1 / 20000 * 100 = 0.005 exactly
        let up = subs(&daily(&[20_000, 20_001]), Offset::DAILY);
        assert_eq!(up.percent_change, Some(Percent::from_hundredths(1)));

        let down = subs(&daily(&[20_000, 19_999]), Offset::DAILY);
        assert_eq!(down.percent_change, Some(Percent::from_hundredths(-1)));

        // 1 / 40000 * 100 = 0.0025, below the half
        let small = subs(&daily(&[40_000, 40_001]), Offset::DAILY);
        assert_eq!(small.percent_change, Some(Percent::ZERO));

        // 2 / 3 * 100 = 66.666…
        let third = subs(&daily(&[3, 5]), Offset::DAILY);
        assert_eq!(third.percent_change.unwrap().to_string(), "66.67");
    }

    #[test]
    fn absolute_change_is_exact_for_large_counts() {
        let big = 9_007_199_254_740_993; // 2^53 + 1, not representable as f64
        let c = subs(&daily(&[big, big + 1]), Offset::DAILY);
        assert_eq!(c.absolute_change, Some(1));
    }

    #[test]
    fn compares_against_the_sample_offset_positions_back() {
        let s = daily(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 50]);
        // latest = 50, seven back = index 2 = 3
        assert_eq!(subs(&s, Offset::WEEKLY).absolute_change, Some(47));
        assert_eq!(subs(&s, Offset::new(9).unwrap()).absolute_change, Some(49));
    }

    #[test]
    fn zero_offset_is_rejected() {
        assert!(Offset::new(0).is_none());
        assert_eq!(Offset::new(7), Some(Offset::WEEKLY));
    }

    #[test]
    fn all_six_values_are_independent() {
        // views = 10 × subs, videos = index
        let s = daily(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let changes = compute_changes(&s);

        assert_eq!(changes.len(), 3);
        let subs = changes[&Metric::Subscribers];
        assert_eq!(subs.daily.absolute_change, Some(1));
        assert_eq!(subs.weekly.absolute_change, Some(7));

        let views = changes[&Metric::Views];
        assert_eq!(views.daily.absolute_change, Some(10));
        assert_eq!(views.weekly.percent_change.unwrap().to_string(), "700.00");

        let videos = changes[&Metric::Videos];
        assert_eq!(videos.weekly.absolute_change, Some(7));
    }

    #[test]
    fn generic_accessor_matches_metric_tag() {
        let s = daily(&[3, 9]);
        let by_tag = compute_change(&s, Metric::Views, Offset::DAILY);
        let by_fn = change_by(s.as_slice(), Offset::DAILY, |x| x.view_count);
        assert_eq!(by_tag, by_fn);
    }

    #[test]
    fn equal_timestamps_still_count_as_positions() {
        let s = Series::new(vec![
            Sample::new(day(1), 10, 0, 0),
            Sample::new(day(1), 12, 0, 0),
        ])
        .unwrap();
        assert_eq!(subs(&s, Offset::DAILY).absolute_change, Some(2));
    }

    #[test]
    fn percent_display_pads_fraction() {
        assert_eq!(Percent::from_hundredths(5).to_string(), "0.05");
        assert_eq!(Percent::from_hundredths(-50).to_string(), "-0.50");
        assert_eq!(Percent::from_hundredths(12345).to_string(), "123.45");
    }
}
