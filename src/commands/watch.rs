use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};
use tracker_config::TrackerConfig;
use tracker_core::{EntityId, EntityReport, SampleStore, SeriesCache};
use tracker_render::render;
use tracker_store::{CsvStore, DataWatcher};

use super::View;

pub async fn run(config: &TrackerConfig, view: &View) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("cannot create '{}'", config.data_dir.display()))?;

    let store = CsvStore::new(&config.data_dir);
    let mut cache = SeriesCache::new();

    for id in store.entities()? {
        show(&store, &mut cache, &id, view);
    }

    let (watcher, mut changes) = DataWatcher::spawn(&config.data_dir);
    info!("Watching '{}' (Ctrl-C to stop)", watcher.dir().display());

    loop {
        tokio::select! {
            changed = changes.recv() => match changed {
                Some(id) => show(&store, &mut cache, &id, view),
                None => {
                    warn!("Filesystem watcher stopped");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn show(store: &CsvStore, cache: &mut SeriesCache, id: &EntityId, view: &View) {
    match cache.get_or_load(store, id) {
        Ok(full) => {
            let report = EntityReport::build(id.clone(), full, view.window, view.anchor, Utc::now());
            println!("{}", render(&report, view.style));
        }
        Err(e) => warn!("{id}: {e}"),
    }
}
