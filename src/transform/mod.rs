//! Benchmark row derivation: typed metadata, then the two extrapolation passes.
//!
//! Order matters: the beyond-top-band pass reads the outer band cells *after*
//! the `>3` pass has turned them into formulas.

pub mod extrapolate;
pub mod format;
pub mod situation;

pub use extrapolate::*;
pub use format::*;
pub use situation::*;

use crate::domain::{BandConfig, BenchmarkRow, RowRecord};
use crate::error::AppError;

/// Derive every benchmark row, failing on the first defective one.
pub fn derive_benchmark_rows(records: &[RowRecord], bands: &BandConfig) -> Result<Vec<BenchmarkRow>, AppError> {
    let mut rows = records.iter().map(derive_row).collect::<Result<Vec<_>, _>>()?;

    let extrapolated = extrapolate_dependants(&mut rows)?;
    extrapolate_beyond_top_band(&mut rows, bands)?;

    tracing::info!(
        rows = rows.len(),
        more_than_three = extrapolated,
        beyond_top = %bands.beyond_top_label(),
        "derived benchmark rows"
    );
    Ok(rows)
}
