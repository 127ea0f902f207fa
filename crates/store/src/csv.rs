//! Append-only CSV storage.
//!
//! Each entity is a file `<data_dir>/<entity>.csv`:
//!
//! ```text
//! timestamp,subscriber_count,view_count,video_count
//! 2024-01-01 00:00:05,1200,56000,31
//! ```
//!
//! Timestamps are UTC with second resolution. Rows are appended newest-last
//! and never rewritten. Columns are located through the header, so files
//! with reordered columns still load.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracker_core::{
    EntityId, Freshness, Metric, Result, Sample, SampleSink, SampleStore, Series, TrackerError,
};

pub const HEADER: &str = "timestamp,subscriber_count,view_count,video_count";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const EXTENSION: &str = "csv";

/// [`SampleStore`] / [`SampleSink`] over a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Use `dir` as the data directory. Nothing is created until the first
    /// append.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `entity`.
    ///
    /// Entity IDs become file names, so anything that could escape the data
    /// directory is rejected.
    pub fn path_for(&self, entity: &EntityId) -> Result<PathBuf> {
        let id = entity.as_str();
        let invalid = id.is_empty()
            || id.starts_with('.')
            || id.contains(['/', '\\', '\0']);
        if invalid {
            return Err(TrackerError::Store(format!("invalid entity id '{id}'")));
        }
        Ok(self.dir.join(format!("{id}.{EXTENSION}")))
    }

    /// Entity stored in `path`, if it is a sample file.
    pub fn entity_for(path: &Path) -> Option<EntityId> {
        if path.extension()? != EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        (!stem.is_empty()).then(|| EntityId::new(stem))
    }
}

impl SampleStore for CsvStore {
    fn load(&self, entity: &EntityId) -> Result<Series> {
        let path = self.path_for(entity)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Series::empty()),
            Err(e) => return Err(e.into()),
        };
        let series = parse_series(&text, &path)?;
        debug!(%entity, samples = series.len(), "loaded {}", path.display());
        Ok(series)
    }

    fn freshness(&self, entity: &EntityId) -> Result<Freshness> {
        let path = self.path_for(entity)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(Freshness::new(meta.len(), meta.modified().ok())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Freshness::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn entities(&self) -> Result<Vec<EntityId>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(id) = Self::entity_for(&entry.path()) {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl SampleSink for CsvStore {
    fn append(&self, entity: &EntityId, sample: &Sample) -> Result<()> {
        let path = self.path_for(entity)?;
        fs::create_dir_all(&self.dir)?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let is_new = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);

        if is_new {
            writeln!(writer, "{HEADER}")?;
        }
        writeln!(writer, "{}", format_row(sample))?;
        writer.flush()?;

        debug!(%entity, "appended sample to {}", path.display());
        Ok(())
    }
}

/// Render one sample as a CSV row (no trailing newline).
pub fn format_row(sample: &Sample) -> String {
    format!(
        "{},{},{},{}",
        sample.timestamp.format(TIMESTAMP_FORMAT),
        sample.subscriber_count,
        sample.view_count,
        sample.video_count
    )
}

/// Column positions resolved from the header line.
struct Columns {
    timestamp: usize,
    metrics:   [usize; 3],
    width:     usize,
}

impl Columns {
    fn from_header(line: &str) -> Result<Self> {
        let names: Vec<&str> = line.split(',').map(str::trim).collect();
        let find = |name: &str| {
            names.iter().position(|n| *n == name).ok_or_else(|| TrackerError::Malformed {
                line:   1,
                reason: format!("header is missing column '{name}'"),
            })
        };

        Ok(Self {
            timestamp: find("timestamp")?,
            metrics: [
                find(Metric::Subscribers.column())?,
                find(Metric::Views.column())?,
                find(Metric::Videos.column())?,
            ],
            width: names.len(),
        })
    }
}

/// Parse a whole file. Malformed rows are logged and skipped so the core
/// only ever sees well-formed samples; a bad header rejects the file.
///
/// Rows are stable-sorted by timestamp, which keeps file order for ties.
pub fn parse_series(text: &str, origin: &Path) -> Result<Series> {
    let mut lines = text
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Ok(Series::empty());
    };
    let columns = Columns::from_header(header)?;

    let mut samples = Vec::new();
    for (line_no, line) in lines {
        match parse_row(line, line_no, &columns) {
            Ok(sample) => samples.push(sample),
            Err(e) => warn!("{}: skipping record: {e}", origin.display()),
        }
    }

    Ok(Series::from_unsorted(samples))
}

fn parse_row(line: &str, line_no: usize, columns: &Columns) -> Result<Sample> {
    let malformed = |reason: String| TrackerError::Malformed { line: line_no, reason };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != columns.width {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            columns.width,
            fields.len()
        )));
    }

    let timestamp = parse_timestamp(fields[columns.timestamp])
        .ok_or_else(|| malformed(format!("bad timestamp '{}'", fields[columns.timestamp])))?;

    let mut counts = [0u64; 3];
    for (slot, &col) in counts.iter_mut().zip(columns.metrics.iter()) {
        *slot = fields[col]
            .parse()
            .map_err(|_| malformed(format!("bad count '{}'", fields[col])))?;
    }

    Ok(Sample::new(timestamp, counts[0], counts[1], counts[2]))
}

/// The fixed storage format, with RFC 3339 accepted for hand-edited files.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .ok()
}
