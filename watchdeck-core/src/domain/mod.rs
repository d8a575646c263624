//! Domain types: bars and validated per-symbol series.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{SeriesError, SymbolSeries};
