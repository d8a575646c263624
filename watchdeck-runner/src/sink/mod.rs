//! Output sinks — idempotent full-replace table writers.
//!
//! `replace_table` is logically delete-all-then-insert: after it returns Ok,
//! the destination shows exactly the given header and rows plus the freshness
//! marker, with nothing left over from a previous, larger write. Calling it
//! twice with identical rows leaves the same visible state.

pub mod csv_file;
pub mod memory;
pub mod sheets;

pub use csv_file::CsvSink;
pub use memory::MemorySink;
pub use sheets::SheetsSink;

use thiserror::Error;

/// Sink failures, split into retryable and fail-fast classes.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("invalid destination '{destination}': {message}")]
    InvalidDestination {
        destination: String,
        message: String,
    },

    #[error("sink HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("sink transport error: {0}")]
    Transport(String),

    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    /// Whether a retry could plausibly succeed.
    ///
    /// 404 counts as transient: a just-created tab can lag behind the
    /// metadata API for a few seconds. Credential and request-shape errors
    /// fail fast.
    pub fn is_transient(&self) -> bool {
        match self {
            SinkError::Transport(_) => true,
            SinkError::Http { status, .. } => {
                *status == 404 || *status == 429 || *status >= 500
            }
            SinkError::MissingCredentials(_)
            | SinkError::InvalidDestination { .. }
            | SinkError::Io(_) => false,
        }
    }
}

/// A named destination table that can be fully replaced.
pub trait TableSink {
    fn name(&self) -> &str;

    /// Replace the destination's entire visible content with
    /// `header` + `rows`, recording `freshness_marker` alongside.
    fn replace_table(
        &self,
        destination: &str,
        header: &[String],
        rows: &[Vec<String>],
        freshness_marker: &str,
    ) -> Result<(), SinkError>;
}
