//! The two generation pipelines.
//!
//! Both follow the same shape:
//! load sheet -> derive rows -> emit rules -> render document -> write file
//!
//! Every step fails fast; nothing is written unless all rows are valid.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dmn::{
    DecisionDocument, IdSource, RandomIds, SequentialIds, TableKind, emit_benchmark_rules, emit_postcode_rules,
};
use crate::domain::{BandConfig, BenchmarkRow, RowRecord, SheetSelector};
use crate::error::AppError;
use crate::io::{load_rows, stage_derived_csv, stage_document, write_document};
use crate::transform::derive_benchmark_rows;

/// How rule ids are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMode {
    /// Random 7-character ids, optionally seeded.
    Random { seed: Option<u64> },
    /// Deterministic counter.
    Sequential,
}

impl IdMode {
    pub fn source(self) -> Box<dyn IdSource> {
        match self {
            IdMode::Random { seed: Some(seed) } => Box::new(RandomIds::seeded(seed)),
            IdMode::Random { seed: None } => Box::new(RandomIds::from_entropy()),
            IdMode::Sequential => Box::new(SequentialIds::new()),
        }
    }
}

/// Resolved settings for a HEM benchmark run.
#[derive(Debug, Clone)]
pub struct HemConfig {
    pub input: PathBuf,
    pub sheet: SheetSelector,
    pub output: PathBuf,
    pub bands: BandConfig,
    pub export_derived: Option<PathBuf>,
    pub ids: IdMode,
}

/// Resolved settings for a postcode run.
#[derive(Debug, Clone)]
pub struct PostcodeConfig {
    pub input: PathBuf,
    pub sheet: SheetSelector,
    pub output: PathBuf,
    pub ids: IdMode,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: TableKind,
    pub input: PathBuf,
    pub sheet: SheetSelector,
    pub output: PathBuf,
    pub rows_read: usize,
    pub rules: usize,
    pub derived_export: Option<PathBuf>,
}

pub fn run_hem(config: &HemConfig) -> Result<RunOutput, AppError> {
    config.bands.validate()?;

    let records = load_non_empty(&config.input, &config.sheet)?;
    let (rows, document) = build_hem_document(&records, &config.bands)?;

    // Both outputs are staged before either is moved into place.
    let export = config
        .export_derived
        .as_deref()
        .map(|path| stage_derived_csv(path, &rows))
        .transpose()?;
    let text = document.render(config.ids.source().as_mut());
    let staged = stage_document(&config.output, &text)?;

    let exported = match export {
        Some(export) => {
            let path = export.path().to_path_buf();
            export.commit()?;
            Some(path)
        }
        None => None,
    };
    if let Err(err) = staged.commit() {
        if let Some(path) = &exported {
            let _ = fs::remove_file(path);
        }
        return Err(err);
    }

    Ok(RunOutput {
        table: TableKind::Benchmark,
        input: config.input.clone(),
        sheet: config.sheet.clone(),
        output: config.output.clone(),
        rows_read: records.len(),
        rules: document.rules.len(),
        derived_export: exported,
    })
}

pub fn run_postcode(config: &PostcodeConfig) -> Result<RunOutput, AppError> {
    let records = load_non_empty(&config.input, &config.sheet)?;
    let document = build_postcode_document(&records)?;

    let text = document.render(config.ids.source().as_mut());
    write_document(&config.output, &text)?;

    Ok(RunOutput {
        table: TableKind::Postcode,
        input: config.input.clone(),
        sheet: config.sheet.clone(),
        output: config.output.clone(),
        rows_read: records.len(),
        rules: document.rules.len(),
        derived_export: None,
    })
}

fn load_non_empty(input: &Path, sheet: &SheetSelector) -> Result<Vec<RowRecord>, AppError> {
    let records = load_rows(input, sheet)?;
    if records.is_empty() {
        return Err(AppError::EmptySheet {
            path: input.to_path_buf(),
        });
    }
    Ok(records)
}

/// Derive benchmark rows and their rules without touching the filesystem.
pub fn build_hem_document(
    records: &[RowRecord],
    bands: &BandConfig,
) -> Result<(Vec<BenchmarkRow>, DecisionDocument), AppError> {
    let rows = derive_benchmark_rows(records, bands)?;
    let rules = emit_benchmark_rules(&rows);
    tracing::info!(rules = rules.len(), "emitted benchmark rules");
    Ok((rows, DecisionDocument::new(TableKind::Benchmark, rules)))
}

pub fn build_postcode_document(records: &[RowRecord]) -> Result<DecisionDocument, AppError> {
    let rules = emit_postcode_rules(records)?;
    tracing::info!(rules = rules.len(), "emitted postcode rules");
    Ok(DecisionDocument::new(TableKind::Postcode, rules))
}
