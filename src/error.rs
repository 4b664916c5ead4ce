//! Application error type.
//!
//! Every failure aborts the run: a partial decision table is worse than none.
//! Each variant carries enough context (source line, column, raw value) for the
//! operator to fix the input and re-run. `exit_code` groups variants the same
//! way across both pipelines:
//!
//! - `2`: bad invocation / input location / configuration
//! - `3`: data defect in the sheet
//! - `4`: output could not be written

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input file not found: '{}'", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read input '{}': {reason}", .path.display())]
    InputUnreadable { path: PathBuf, reason: String },

    #[error("Sheet {selector} not found in '{}' (available: {})", .path.display(), .available.join(", "))]
    SheetNotFound {
        path: PathBuf,
        selector: String,
        available: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No data rows in '{}'", .path.display())]
    EmptySheet { path: PathBuf },

    #[error("Line {line}: missing value for column `{column}`")]
    MissingField { line: usize, column: String },

    #[error("Line {line}: cannot derive relationship status or dependants from situation '{situation}'")]
    UnrecognisedSituation { line: usize, situation: String },

    #[error("Line {line}: region '{region}' has no canonical display name")]
    UnmappedRegion { line: usize, region: String },

    #[error(
        "Line {line}: no {dependants}-dependant benchmark for area '{area}' ({status}){}",
        .column.as_deref().map(|c| format!(" in column `{c}`")).unwrap_or_default()
    )]
    MissingSiblingBenchmark {
        line: usize,
        area: String,
        status: String,
        dependants: u32,
        column: Option<String>,
    },

    #[error("Line {line}: benchmark value '{value}' in column `{column}` is not numeric")]
    NonNumericBenchmark {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: configured band column `{column}` is missing (check the band bounds)")]
    MissingBandColumn { line: usize, column: String },

    #[error("Failed to write decision table '{}': {reason}", .path.display())]
    OutputWriteFailure { path: PathBuf, reason: String },

    #[error("Failed to export derived table '{}': {reason}", .path.display())]
    ExportFailure { path: PathBuf, reason: String },
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InputNotFound { .. }
            | AppError::InputUnreadable { .. }
            | AppError::SheetNotFound { .. }
            | AppError::InvalidConfig(_) => 2,
            AppError::EmptySheet { .. }
            | AppError::MissingField { .. }
            | AppError::UnrecognisedSituation { .. }
            | AppError::UnmappedRegion { .. }
            | AppError::MissingSiblingBenchmark { .. }
            | AppError::NonNumericBenchmark { .. }
            | AppError::MissingBandColumn { .. } => 3,
            AppError::OutputWriteFailure { .. } | AppError::ExportFailure { .. } => 4,
        }
    }
}
