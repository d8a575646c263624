//! Universe — the externally supplied symbol list plus reference info.
//!
//! Stored as a TOML file: an ordered `symbols` list and an optional `info`
//! table mapping a symbol to a display name and category. The engine never
//! embeds market-specific reference data; callers inject it through
//! `ReferenceLookup`, and a missing mapping is an empty string, never an
//! error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("read universe file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("universe has no symbols")]
    Empty,
}

/// Display name and category for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// Ordered symbol list with optional per-symbol reference info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub symbols: Vec<String>,
    #[serde(default)]
    pub info: BTreeMap<String, SymbolInfo>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate: the symbol list must be non-empty.
    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        let universe: Universe = toml::from_str(content)?;
        if universe.symbols.is_empty() {
            return Err(UniverseError::Empty);
        }
        Ok(universe)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Read-only symbol → reference-data mapping injected by the caller.
pub trait ReferenceLookup {
    /// Display name for a symbol; empty when unknown.
    fn display_name(&self, _symbol: &str) -> String {
        String::new()
    }

    /// Category label for a symbol; empty when unknown.
    fn category(&self, _symbol: &str) -> String {
        String::new()
    }
}

impl ReferenceLookup for Universe {
    fn display_name(&self, symbol: &str) -> String {
        self.info
            .get(symbol)
            .map(|info| info.name.clone())
            .unwrap_or_default()
    }

    fn category(&self, symbol: &str) -> String {
        self.info
            .get(symbol)
            .map(|info| info.category.clone())
            .unwrap_or_default()
    }
}

/// Lookup with no reference data at all.
pub struct NoReference;

impl ReferenceLookup for NoReference {}
