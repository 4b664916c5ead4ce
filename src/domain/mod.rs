//! Domain types used throughout both pipelines.
//!
//! This module defines:
//!
//! - loader output (`CellValue`, `RowRecord`, `SheetSelector`)
//! - benchmark configuration and derived rows (`BandConfig`, `BenchmarkRow`)
//! - the canonical region table (`Region`)

pub mod region;
pub mod types;

pub use region::*;
pub use types::*;
