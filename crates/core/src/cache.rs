use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::sample::{EntityId, Series};
use crate::store::{Freshness, SampleStore};

/// Caller-owned memoization of loaded series, keyed by entity and
/// [`Freshness`] token.
///
/// A cached series is reused only while the store reports the same token for
/// its entity. The token is read *before* loading, so a write racing with the
/// load can only cause one extra reload later, never a stale hit.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<EntityId, Entry>,
}

#[derive(Debug)]
struct Entry {
    token:  Freshness,
    series: Series,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the series for `entity`, loading it from `store` if it is not
    /// cached or its token has changed.
    pub fn get_or_load<S>(&mut self, store: &S, entity: &EntityId) -> Result<&Series>
    where
        S: SampleStore + ?Sized,
    {
        let token = store.freshness(entity)?;
        let stale = self
            .entries
            .get(entity)
            .map_or(true, |e| e.token != token);

        if stale {
            let series = store.load(entity)?;
            debug!(%entity, samples = series.len(), "series loaded");
            self.entries.insert(entity.clone(), Entry { token, series });
        }

        Ok(&self.entries[entity].series)
    }

    /// Drop the cached series of `entity`, forcing the next access to reload.
    pub fn invalidate(&mut self, entity: &EntityId) {
        self.entries.remove(entity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::fixtures::day;
    use crate::sample::Sample;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory store whose freshness token is the sample count.
    #[derive(Default)]
    struct MemStore {
        data:  Mutex<HashMap<EntityId, Vec<Sample>>>,
        loads: AtomicUsize,
    }

    impl MemStore {
        fn push(&self, entity: &str, sample: Sample) {
            self.data
                .lock()
                .unwrap()
                .entry(EntityId::from(entity))
                .or_default()
                .push(sample);
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl SampleStore for MemStore {
        fn load(&self, entity: &EntityId) -> Result<Series> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let data = self.data.lock().unwrap();
            Series::new(data.get(entity).cloned().unwrap_or_default())
        }

        fn freshness(&self, entity: &EntityId) -> Result<Freshness> {
            let len = self.data.lock().unwrap().get(entity).map_or(0, Vec::len);
            Ok(Freshness::new(len as u64, None))
        }

        fn entities(&self) -> Result<Vec<EntityId>> {
            Ok(self.data.lock().unwrap().keys().cloned().collect())
        }
    }

    #[test]
    fn reuses_series_while_token_is_unchanged() {
        let store = MemStore::default();
        store.push("a", Sample::new(day(1), 1, 1, 1));
        let id = EntityId::from("a");
        let mut cache = SeriesCache::new();

        assert_eq!(cache.get_or_load(&store, &id).unwrap().len(), 1);
        assert_eq!(cache.get_or_load(&store, &id).unwrap().len(), 1);
        assert_eq!(store.loads(), 1);
    }

    #[test]
    fn reloads_after_append() {
        let store = MemStore::default();
        store.push("a", Sample::new(day(1), 1, 1, 1));
        let id = EntityId::from("a");
        let mut cache = SeriesCache::new();
        cache.get_or_load(&store, &id).unwrap();

        store.push("a", Sample::new(day(2), 2, 2, 2));
        let series = cache.get_or_load(&store, &id).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().map(|s| s.subscriber_count), Some(2));
        assert_eq!(store.loads(), 2);
    }

    #[test]
    fn unknown_entity_caches_empty_series() {
        let store = MemStore::default();
        let mut cache = SeriesCache::new();
        let id = EntityId::from("missing");

        assert!(cache.get_or_load(&store, &id).unwrap().is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let store = MemStore::default();
        store.push("a", Sample::new(day(1), 1, 1, 1));
        let id = EntityId::from("a");
        let mut cache = SeriesCache::new();

        cache.get_or_load(&store, &id).unwrap();
        cache.invalidate(&id);
        cache.get_or_load(&store, &id).unwrap();
        assert_eq!(store.loads(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
