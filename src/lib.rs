//! `dmn-mapping` library crate.
//!
//! Generates DMN decision tables (HEM benchmarks, postcode → area) from
//! spreadsheet exports. The binary (`dmngen`) is a thin wrapper around this
//! library so the pipelines are testable without spawning processes.

pub mod app;
pub mod cli;
pub mod dmn;
pub mod domain;
pub mod error;
pub mod formula;
pub mod io;
pub mod logging;
pub mod report;
pub mod transform;
