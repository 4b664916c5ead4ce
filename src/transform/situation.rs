//! Relationship status and dependant count from the free-text `situation` cell.
//!
//! The HEM sheet describes each row as e.g. "Couple with 2 dependants",
//! "Single with no dependants" or "Couple with more than 3 dependants".

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    BandCell, BenchmarkRow, BenchmarkValue, CellValue, Dependants, RowRecord, StatusGroup, normalize_region,
};
use crate::error::AppError;

pub const SITUATION_COLUMN: &str = "situation";
pub const AREA_COLUMN: &str = "area";

/// Columns that describe a row rather than hold a band figure.
pub const METADATA_COLUMNS: [&str; 4] = [SITUATION_COLUMN, AREA_COLUMN, "relationshipStatus", "numberOfDependants"];

static FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("static regex"));

pub fn is_metadata_column(label: &str) -> bool {
    METADATA_COLUMNS.contains(&label)
}

pub fn derive_status(line: usize, situation: &str) -> Result<StatusGroup, AppError> {
    if situation.contains("Couple") {
        Ok(StatusGroup::Coupled)
    } else if situation.contains("Single") {
        Ok(StatusGroup::Single)
    } else {
        Err(AppError::UnrecognisedSituation {
            line,
            situation: situation.to_string(),
        })
    }
}

/// Dependant count: `more than 3` wins, then the first integer in the text.
///
/// Text without any digits ("no dependants") means zero. This is the one
/// place a missing value defaults instead of failing.
pub fn derive_dependants(line: usize, situation: &str) -> Result<Dependants, AppError> {
    if situation.contains("more than 3") {
        return Ok(Dependants::MoreThanThree);
    }
    match FIRST_NUMBER.find(situation) {
        Some(m) => m
            .as_str()
            .parse::<u32>()
            .map(Dependants::Exactly)
            .map_err(|_| AppError::UnrecognisedSituation {
                line,
                situation: situation.to_string(),
            }),
        None => {
            tracing::debug!(line, situation, "no dependant count in situation, using 0");
            Ok(Dependants::Exactly(0))
        }
    }
}

/// Narrow a loaded row into a `BenchmarkRow`, keeping band cells in sheet order.
pub fn derive_row(record: &RowRecord) -> Result<BenchmarkRow, AppError> {
    let situation = match record.require(SITUATION_COLUMN)? {
        CellValue::Text(s) => s.clone(),
        other => other.display_text(),
    };
    let area = record.require(AREA_COLUMN)?.display_text();

    let status = derive_status(record.line, &situation)?;
    let dependants = derive_dependants(record.line, &situation)?;
    let region = normalize_region(record.line, &area)?;

    let bands = record
        .cells
        .iter()
        .filter(|(label, _)| !is_metadata_column(label))
        .map(|(label, value)| BandCell {
            label: label.clone(),
            value: BenchmarkValue::Cell(value.clone()),
        })
        .collect();

    Ok(BenchmarkRow {
        line: record.line,
        situation,
        area,
        region,
        status,
        dependants,
        bands,
    })
}
