use thiserror::Error;

/// Top-level error type shared by every library crate in the workspace.
///
/// Insufficient history and empty periods are *not* errors; they are
/// represented as data (`None` fields, empty series) by the core.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),

    /// A persisted record could not be parsed. Raised at the storage
    /// boundary only; the core never receives partial records.
    #[error("malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("source error: {0}")]
    Source(String),

    /// Samples handed to [`crate::Series::new`] were not in timestamp order.
    #[error("series is not ordered by timestamp (first violation at index {index})")]
    Unordered { index: usize },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
