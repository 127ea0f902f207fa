use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracker_core::EntityId;

use crate::csv::CsvStore;

/// Watches a data directory and reports which entity's sample file changed.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_, mut rx) = tracker_store::DataWatcher::spawn("data");
/// while let Some(entity) = rx.recv().await {
///     println!("{entity} has new samples");
/// }
/// # }
/// ```
pub struct DataWatcher {
    dir: PathBuf,
}

impl DataWatcher {
    /// Spawn a filesystem watcher for `dir`.
    /// Returns the watcher handle and a receiver yielding the entity of every
    /// created or modified sample file. Must be called inside a Tokio runtime.
    pub fn spawn(dir: impl AsRef<Path>) -> (Self, mpsc::Receiver<EntityId>) {
        let (tx, rx) = mpsc::channel(16);
        let dir = dir.as_ref().to_path_buf();
        let watcher = Self { dir: dir.clone() };

        tokio::spawn(watch_loop(dir, tx));

        (watcher, rx)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

async fn watch_loop(dir: PathBuf, tx: mpsc::Sender<EntityId>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching data directory: {}", dir.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) => {
                for entity in changed_entities(&e) {
                    if tx.send(entity).await.is_err() {
                        return; // receiver dropped
                    }
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

/// Sample files touched by a create/modify event.
fn changed_entities(event: &notify::Event) -> Vec<EntityId> {
    use notify::EventKind::*;
    if !matches!(event.kind, Modify(_) | Create(_)) {
        return Vec::new();
    }
    let mut ids: Vec<EntityId> = event
        .paths
        .iter()
        .filter_map(|p| CsvStore::entity_for(p))
        .collect();
    ids.dedup();
    ids
}
