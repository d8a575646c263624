//! CSV artifact sink — one file per destination, for offline and dry runs.
//!
//! The file layout mirrors the spreadsheet layout: first record is the
//! freshness marker, then the header, then the data rows. Recreating the file
//! on every write gives the same full-replace semantics as the remote sink.

use super::{SinkError, TableSink};
use std::path::{Path, PathBuf};

pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, SinkError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Destination names become file names; keep them path-safe.
    fn path_for(&self, destination: &str) -> PathBuf {
        let safe: String = destination
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{safe}.csv"))
    }
}

impl TableSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn replace_table(
        &self,
        destination: &str,
        header: &[String],
        rows: &[Vec<String>],
        freshness_marker: &str,
    ) -> Result<(), SinkError> {
        let path = self.path_for(destination);
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| SinkError::Transport(format!("open {}: {e}", path.display())))?;

        writer
            .write_record([freshness_marker])
            .and_then(|_| writer.write_record(header))
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| SinkError::Transport(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(())
    }
}
