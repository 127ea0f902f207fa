use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};
use tracker_config::TrackerConfig;
use tracker_core::{EntityId, EntityReport, SampleStore};
use tracker_render::{chart::write_json, render, Chart};
use tracker_store::CsvStore;

use super::View;

pub fn run(
    config:  &TrackerConfig,
    view:    &View,
    channel: Option<String>,
    json:    Option<PathBuf>,
) -> Result<()> {
    let store = CsvStore::new(&config.data_dir);
    let entities = match channel {
        Some(id) => vec![EntityId::new(id)],
        None => store.entities()?,
    };

    if entities.is_empty() {
        warn!("No sample files in '{}'; run `tracker collect` first", store.dir().display());
        return Ok(());
    }

    let now = Utc::now();
    let mut charts = Vec::with_capacity(entities.len());

    for id in entities {
        let full = match store.load(&id) {
            Ok(series) => series,
            Err(e) => {
                warn!("{id}: {e}");
                continue;
            }
        };
        let report = EntityReport::build(id, &full, view.window, view.anchor, now);
        println!("{}", render(&report, view.style));
        charts.push(Chart::from_report(&report));
    }

    if let Some(path) = json {
        let file = File::create(&path)
            .with_context(|| format!("cannot create '{}'", path.display()))?;
        write_json(&charts, BufWriter::new(file))?;
        info!("Wrote {} chart(s) to '{}'", charts.len(), path.display());
    }

    Ok(())
}
