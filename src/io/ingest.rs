//! Sheet ingest.
//!
//! Turns one sheet of a workbook (or a CSV file) into ordered `RowRecord`s:
//! - the first row is the header; blank header cells are not columns
//! - completely empty rows are skipped
//! - empty cells are left out of the record (absence is for consumers to judge)
//! - no domain interpretation happens here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::domain::{CellValue, RowRecord, SheetSelector};
use crate::error::AppError;

/// Load the selected sheet. `.csv` files count as a single sheet (index 0).
pub fn load_rows(path: &Path, selector: &SheetSelector) -> Result<Vec<RowRecord>, AppError> {
    if !path.is_file() {
        return Err(AppError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        load_csv(path, selector)?
    } else {
        load_workbook(path, selector)?
    };

    tracing::info!(path = %path.display(), sheet = %selector, rows = rows.len(), "loaded sheet");
    Ok(rows)
}

fn load_workbook(path: &Path, selector: &SheetSelector) -> Result<Vec<RowRecord>, AppError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(path, e))?;

    let names = workbook.sheet_names();
    let name = match selector {
        SheetSelector::Index(i) => names.get(*i).cloned(),
        SheetSelector::Name(n) => names.iter().find(|s| *s == n).cloned(),
    }
    .ok_or_else(|| AppError::SheetNotFound {
        path: path.to_path_buf(),
        selector: selector.to_string(),
        available: names.clone(),
    })?;

    let range = workbook.worksheet_range(&name).map_err(|e| unreadable(path, e))?;
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let labels = header_labels(header.iter().map(|cell| data_to_cell(cell).map(|v| v.display_text())));

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        let cells = labels
            .iter()
            .zip(row.iter())
            .filter_map(|(label, cell)| Some((label.clone()?, data_to_cell(cell)?)))
            .collect::<Vec<_>>();
        if cells.is_empty() {
            continue;
        }
        records.push(RowRecord {
            line: first_line + idx + 1,
            cells,
        });
    }
    Ok(records)
}

fn load_csv(path: &Path, selector: &SheetSelector) -> Result<Vec<RowRecord>, AppError> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
    let selected = match selector {
        SheetSelector::Index(i) => *i == 0,
        SheetSelector::Name(n) => *n == stem,
    };
    if !selected {
        return Err(AppError::SheetNotFound {
            path: path.to_path_buf(),
            selector: selector.to_string(),
            available: vec![stem],
        });
    }

    let file = File::open(path).map_err(|e| unreadable(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| unreadable(path, e))?.clone();
    let labels = header_labels(headers.iter().map(|h| {
        let h = normalize_header_name(h);
        (!h.is_empty()).then(|| h.to_string())
    }));

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, header on line 1.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::InputUnreadable {
            path: path.to_path_buf(),
            reason: format!("line {line}: {e}"),
        })?;

        let cells = labels
            .iter()
            .zip(record.iter())
            .filter_map(|(label, field)| Some((label.clone()?, csv_field_to_cell(field)?)))
            .collect::<Vec<_>>();
        if cells.is_empty() {
            continue;
        }
        records.push(RowRecord { line, cells });
    }
    Ok(records)
}

/// Header labels by column; `None` for blank headers. Repeated labels get a
/// `_1`, `_2`, ... suffix so every column stays addressable.
fn header_labels(raw: impl Iterator<Item = Option<String>>) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.map(|label| {
        let label = label.filter(|l| !l.trim().is_empty())?;
        let count = seen.entry(label.clone()).or_insert(0);
        let unique = if *count == 0 {
            label.clone()
        } else {
            format!("{label}_{count}")
        };
        *count += 1;
        Some(unique)
    })
    .collect()
}

fn normalize_header_name(name: &str) -> &str {
    // Excel's "CSV UTF-8" export prefixes the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn data_to_cell(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Text(b.to_string())),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        other => Some(CellValue::Text(other.to_string())),
    }
}

fn csv_field_to_cell(field: &str) -> Option<CellValue> {
    if field.is_empty() {
        return None;
    }
    // Codes with a leading zero ("0800") are identifiers, not numbers.
    let leading_zero = field.len() > 1 && field.starts_with('0') && !field.starts_with("0.");
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() && !leading_zero => Some(CellValue::Number(v)),
        _ => Some(CellValue::Text(field.to_string())),
    }
}

fn unreadable(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::InputUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
