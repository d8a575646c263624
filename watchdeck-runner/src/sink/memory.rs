//! In-memory sink — the test double that proves the full-replace contract.

use super::{SinkError, TableSink};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Visible state of one destination after the last replace.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub freshness_marker: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Sink that keeps every destination in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: Mutex<BTreeMap<String, TableState>>,
    writes: Mutex<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible state of a destination, if it was ever written.
    pub fn table(&self, destination: &str) -> Option<TableState> {
        self.tables.lock().unwrap().get(destination).cloned()
    }

    /// Destinations written so far, in name order.
    pub fn destinations(&self) -> Vec<String> {
        self.tables.lock().unwrap().keys().cloned().collect()
    }

    /// Total number of successful replace calls.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl TableSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn replace_table(
        &self,
        destination: &str,
        header: &[String],
        rows: &[Vec<String>],
        freshness_marker: &str,
    ) -> Result<(), SinkError> {
        let state = TableState {
            freshness_marker: freshness_marker.to_string(),
            header: header.to_vec(),
            rows: rows.to_vec(),
        };
        self.tables
            .lock()
            .unwrap()
            .insert(destination.to_string(), state);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}
