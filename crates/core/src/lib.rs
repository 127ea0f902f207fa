//! Time-series core: sample model, period filtering and change computation.
//!
//! Everything here is pure and synchronous. Storage, upstream collection and
//! presentation live in the sibling crates and talk to the core through
//! [`SampleStore`] / [`SampleSink`] and [`EntityReport`].

pub mod cache;
pub mod delta;
pub mod error;
pub mod report;
pub mod sample;
pub mod store;
pub mod window;

pub use cache::SeriesCache;
pub use delta::{compute_change, compute_changes, ChangeMetric, MetricChanges, Offset, Percent};
pub use error::{Result, TrackerError};
pub use report::{Anchor, Coverage, EntityReport};
pub use sample::{EntityId, Metric, Sample, Series};
pub use store::{Freshness, SampleSink, SampleStore};
pub use window::{filter, filter_at, Window};
