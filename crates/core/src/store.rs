use std::time::SystemTime;

use crate::error::Result;
use crate::sample::{EntityId, Sample, Series};

/// Read side of persisted sample history.
///
/// Implementations must return series ordered by timestamp (ties in read
/// order) containing only well-formed samples. Loading an entity that has
/// never been sampled yields an empty series, not an error.
///
/// Reads of different entities are independent and may run concurrently.
pub trait SampleStore: Send + Sync {
    /// Load the complete history of `entity`.
    fn load(&self, entity: &EntityId) -> Result<Series>;

    /// Token that changes whenever the persisted history of `entity` changes.
    fn freshness(&self, entity: &EntityId) -> Result<Freshness>;

    /// Every entity with persisted history.
    fn entities(&self) -> Result<Vec<EntityId>>;
}

/// Append-only write side of sample history.
pub trait SampleSink: Send + Sync {
    /// Append one sample as the newest record of `entity`.
    fn append(&self, entity: &EntityId, sample: &Sample) -> Result<()>;
}

/// Opaque change-detection token for one entity's persisted history.
///
/// The default value stands for "nothing persisted yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Freshness {
    len:      u64,
    modified: Option<SystemTime>,
}

impl Freshness {
    pub fn new(len: u64, modified: Option<SystemTime>) -> Self {
        Self { len, modified }
    }
}
