use anyhow::{bail, ensure, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracker_collect::{collect_once, spawn_collector, CollectSummary, YouTubeSource};
use tracker_config::TrackerConfig;
use tracker_store::CsvStore;

pub async fn run(config: &TrackerConfig, daemon: bool) -> Result<()> {
    let source = YouTubeSource::from_config(&config.collect)?;
    let store = CsvStore::new(&config.data_dir);

    if !daemon {
        let summary = collect_once(&source, &store, &config.channels, Utc::now()).await;
        report(&summary);
        if summary.stored.is_empty() && !summary.failed.is_empty() {
            bail!("every channel failed to collect");
        }
        return Ok(());
    }

    ensure!(config.collect.interval_secs > 0, "collect.interval_secs must be positive");
    let interval = Duration::from_secs(config.collect.interval_secs);
    info!("Collecting every {}s (Ctrl-C to stop)", interval.as_secs());

    let mut runs = spawn_collector(
        Arc::new(source),
        Arc::new(store),
        config.channels.clone(),
        interval,
    );

    loop {
        tokio::select! {
            summary = runs.recv() => match summary {
                Some(summary) => report(&summary),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn report(summary: &CollectSummary) {
    for id in &summary.stored {
        println!("sampled  {id}");
    }
    for (handle, reason) in &summary.failed {
        println!("skipped  {handle}: {reason}");
    }
    if !summary.is_success() {
        warn!("{} channel(s) not collected", summary.failed.len());
    }
}
