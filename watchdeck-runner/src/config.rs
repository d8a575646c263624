//! Serializable run configuration.
//!
//! One TOML file captures everything a run needs: the symbol list (inline or
//! via a universe file), the date range, indicator/signal tuning, retry and
//! politeness settings, and the destination tables for each mode. The `mode`
//! field selects between the dev and prod destination sets so a test
//! spreadsheet never receives prod data by accident.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use watchdeck_core::data::RetryPolicy;
use watchdeck_core::indicators::IndicatorConfig;
use watchdeck_core::signals::SignalConfig;

/// Content-addressable identifier for a run configuration.
pub type RunFingerprint = String;

/// Which destination set receives the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Dev,
    Prod,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Mode::Dev),
            "prod" => Ok(Mode::Prod),
            other => Err(format!("unknown mode '{other}' (expected dev or prod)")),
        }
    }
}

/// One bounded watchlist and the table it is written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistDest {
    pub table: String,
    pub size: usize,
}

/// The tables one mode writes: the full universe plus its watchlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationSet {
    pub universe_table: String,
    pub watchlists: Vec<WatchlistDest>,
}

impl DestinationSet {
    fn dev_default() -> Self {
        Self {
            universe_table: "universe-dev".into(),
            watchlists: vec![
                WatchlistDest {
                    table: "watchlist-10-dev".into(),
                    size: 10,
                },
                WatchlistDest {
                    table: "watchlist-5-dev".into(),
                    size: 5,
                },
            ],
        }
    }

    fn prod_default() -> Self {
        Self {
            universe_table: "universe".into(),
            watchlists: vec![
                WatchlistDest {
                    table: "watchlist-10".into(),
                    size: 10,
                },
                WatchlistDest {
                    table: "watchlist-5".into(),
                    size: 5,
                },
            ],
        }
    }
}

/// Complete configuration for a single pipeline run.
///
/// Scalar fields come before the nested tables so the TOML serializer never
/// emits a value after a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mode: Mode,

    /// Spreadsheet the sheets sink writes into.
    pub spreadsheet_id: String,

    /// Inline symbol list; may instead come from `universe_file`.
    pub symbols: Vec<String>,

    /// Optional universe TOML supplying symbols and reference info.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universe_file: Option<PathBuf>,

    /// First bar date (inclusive).
    pub start_date: NaiveDate,

    /// Last bar date (inclusive). `None` means "today" at run time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Sleep between per-symbol fetches, to stay under upstream rate limits.
    pub politeness_delay_ms: u64,

    /// Suffix appended to every symbol at the fetch boundary (e.g. ".TW").
    pub symbol_suffix: String,

    /// Offset used for the freshness marker timestamp.
    pub utc_offset_hours: i32,

    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
    pub retry: RetryPolicy,
    pub dev: DestinationSet,
    pub prod: DestinationSet,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Dev,
            spreadsheet_id: String::new(),
            symbols: Vec::new(),
            universe_file: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            end_date: None,
            indicators: IndicatorConfig::default(),
            signals: SignalConfig::default(),
            retry: RetryPolicy::default(),
            politeness_delay_ms: 250,
            symbol_suffix: String::new(),
            utc_offset_hours: 8,
            dev: DestinationSet::dev_default(),
            prod: DestinationSet::prod_default(),
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The destination set selected by `mode`.
    pub fn destinations(&self) -> &DestinationSet {
        match self.mode {
            Mode::Dev => &self.dev,
            Mode::Prod => &self.prod,
        }
    }

    /// Timezone for the freshness marker.
    pub fn timezone(&self) -> FixedOffset {
        let hours = self.utc_offset_hours.clamp(-23, 23);
        FixedOffset::east_opt(hours * 3600).expect("clamped offset is valid")
    }

    /// Deterministic hash of this configuration, for log and artifact
    /// correlation: identical configs produce identical fingerprints.
    pub fn fingerprint(&self) -> RunFingerprint {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
