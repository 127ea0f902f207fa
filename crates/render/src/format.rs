use tracker_core::{ChangeMetric, Metric};

/// Shown in place of a change when the history is too short.
pub const INSUFFICIENT: &str = "insufficient data";

/// Human-readable metric name.
pub fn metric_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Subscribers => "Subscribers",
        Metric::Views       => "Views",
        Metric::Videos      => "Videos",
    }
}

/// Insert `,` every three digits (e.g. `"1,234,567"`).
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// A count with thousands separators.
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Signed change: `+` for zero and growth, `-` for a decrease.
fn format_signed(n: i64) -> String {
    let sign = if n < 0 { '-' } else { '+' };
    format!("{sign}{}", group_thousands(&n.unsigned_abs().to_string()))
}

/// `+1,234 (+10.00%)`, or [`INSUFFICIENT`] when no change is available.
///
/// The percentage follows the direction of the absolute change, so a tiny
/// loss that rounds to zero reads `-1 (-0.00%)`. A zero-baseline change reads
/// `+5 (+0.00%)`.
pub fn format_change(change: &ChangeMetric) -> String {
    match (change.absolute_change, change.percent_change) {
        (Some(abs), Some(pct)) => {
            let sign = match (pct.is_negative(), abs < 0) {
                (true, _)      => "",
                (false, true)  => "-",
                (false, false) => "+",
            };
            format!("{} ({sign}{pct}%)", format_signed(abs))
        }
        _ => INSUFFICIENT.to_string(),
    }
}
