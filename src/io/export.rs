//! Output files: the decision table itself and the optional derived-table CSV.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::dmn::output_text;
use crate::domain::BenchmarkRow;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputKind {
    Document,
    DerivedExport,
}

impl OutputKind {
    fn error(self, path: &Path, reason: impl fmt::Display) -> AppError {
        let path = path.to_path_buf();
        let reason = reason.to_string();
        match self {
            OutputKind::Document => AppError::OutputWriteFailure { path, reason },
            OutputKind::DerivedExport => AppError::ExportFailure { path, reason },
        }
    }
}

/// A fully written output file waiting next to its target.
///
/// `commit` renames it into place; dropping it uncommitted deletes the temp
/// file, so an aborted run leaves nothing behind.
#[derive(Debug)]
pub struct StagedOutput {
    path: PathBuf,
    file: NamedTempFile,
    kind: OutputKind,
    bytes: usize,
}

impl StagedOutput {
    fn write(path: &Path, kind: OutputKind, bytes: &[u8]) -> Result<Self, AppError> {
        let fail = |e: std::io::Error| kind.error(path, e);

        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(fail)?;
                parent
            }
            None => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(parent).map_err(fail)?;
        file.write_all(bytes).map_err(fail)?;
        file.as_file().sync_all().map_err(fail)?;

        Ok(StagedOutput {
            path: path.to_path_buf(),
            file,
            kind,
            bytes: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the staged file over the target, replacing any existing file.
    pub fn commit(self) -> Result<(), AppError> {
        let StagedOutput { path, file, kind, bytes } = self;
        file.persist(&path).map_err(|e| kind.error(&path, e.error))?;
        match kind {
            OutputKind::Document => tracing::info!(path = %path.display(), bytes, "decision table written"),
            OutputKind::DerivedExport => tracing::info!(path = %path.display(), bytes, "derived table exported"),
        }
        Ok(())
    }
}

/// Stage the decision table text at `path`.
pub fn stage_document(path: &Path, text: &str) -> Result<StagedOutput, AppError> {
    StagedOutput::write(path, OutputKind::Document, text.as_bytes())
}

/// Write the document, replacing any existing file. A failed write never
/// leaves a truncated table at `path`.
pub fn write_document(path: &Path, text: &str) -> Result<(), AppError> {
    stage_document(path, text)?.commit()
}

/// Stage the derived benchmark table for review.
///
/// Columns: `situation`, `relationshipStatus`, `numberOfDependants`, `area`,
/// then every band column in first-seen order. Formulas are written as
/// rendered text.
pub fn stage_derived_csv(path: &Path, rows: &[BenchmarkRow]) -> Result<StagedOutput, AppError> {
    let fail = |e: csv::Error| OutputKind::DerivedExport.error(path, e);

    let mut bands: Vec<&str> = Vec::new();
    for row in rows {
        for band in &row.bands {
            if !bands.contains(&band.label.as_str()) {
                bands.push(&band.label);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["situation", "relationshipStatus", "numberOfDependants", "area"];
    header.extend(bands.iter().copied());
    writer.write_record(&header).map_err(fail)?;

    for row in rows {
        let mut record = vec![
            row.situation.clone(),
            row.status.joined_tokens(),
            row.dependants.to_string(),
            row.area.clone(),
        ];
        record.extend(
            bands
                .iter()
                .map(|label| row.band(label).map(output_text).unwrap_or_default()),
        );
        writer.write_record(&record).map_err(fail)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputKind::DerivedExport.error(path, e.error()))?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "derived table staged");
    StagedOutput::write(path, OutputKind::DerivedExport, &bytes)
}
