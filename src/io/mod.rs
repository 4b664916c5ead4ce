//! Input/output helpers.
//!
//! - sheet ingest (`ingest`)
//! - band configuration JSON (`config`)
//! - decision table and derived-table writers (`export`)

pub mod config;
pub mod export;
pub mod ingest;

pub use config::*;
pub use export::*;
pub use ingest::*;
