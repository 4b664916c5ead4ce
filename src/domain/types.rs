//! Shared domain types.
//!
//! Rows come out of the loader as loosely-typed `RowRecord`s (label → cell) and
//! the benchmark pipeline narrows them into `BenchmarkRow`s whose metadata
//! fields are typed and whose band cells are either concrete figures or
//! deferred formulas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Region;
use crate::error::AppError;
use crate::formula::Expr;

/// A non-empty spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Render the cell the way a plain string interpolation would (`2000`, not `2000.0`).
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                    format!("{}", *v as i64)
                } else {
                    format!("{v}")
                }
            }
        }
    }
}

/// One input row: source line plus the present cells in sheet column order.
///
/// Empty cells are simply not stored; `get` returning `None` is how consumers
/// see them.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub line: usize,
    pub cells: Vec<(String, CellValue)>,
}

impl RowRecord {
    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// Like `get`, but absence is a `MissingField` error.
    pub fn require(&self, label: &str) -> Result<&CellValue, AppError> {
        self.get(label).ok_or_else(|| AppError::MissingField {
            line: self.line,
            column: label.to_string(),
        })
    }
}

/// Which sheet of a workbook to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl FromStr for SheetSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("sheet selector must not be empty".to_string());
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<usize>()
                .map(SheetSelector::Index)
                .map_err(|e| format!("invalid sheet index '{s}': {e}"));
        }
        Ok(SheetSelector::Name(s.to_string()))
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{i}"),
            SheetSelector::Name(n) => write!(f, "'{n}'"),
        }
    }
}

/// The top three income band boundaries of the current HEM table.
///
/// These must be updated whenever the source table's bands change; they are
/// never inferred from the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandConfig {
    pub upper: u64,
    pub second_upper: u64,
    pub third_upper: u64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            upper: 630_000,
            second_upper: 378_000,
            third_upper: 315_000,
        }
    }
}

impl BandConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.upper > self.second_upper && self.second_upper > self.third_upper && self.third_upper > 0) {
            return Err(AppError::InvalidConfig(format!(
                "band bounds must satisfy upper > second > third > 0 (got {} / {} / {})",
                self.upper, self.second_upper, self.third_upper
            )));
        }
        Ok(())
    }

    /// Label of the outermost closed band, e.g. `[378000..630000[`.
    pub fn upper_range_label(&self) -> String {
        format!("[{}..{}[", self.second_upper, self.upper)
    }

    /// Label of the second outermost band, e.g. `[315000..378000[`.
    pub fn second_range_label(&self) -> String {
        format!("[{}..{}[", self.third_upper, self.second_upper)
    }

    /// Label of the synthesised open-ended column, e.g. `>=630000`.
    pub fn beyond_top_label(&self) -> String {
        format!(">={}", self.upper)
    }

    pub fn midpoint(&self) -> f64 {
        (self.upper as f64 + self.second_upper as f64) / 2.0
    }
}

/// Canonical relationship-status group derived from the situation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusGroup {
    Coupled,
    Single,
}

impl StatusGroup {
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            StatusGroup::Coupled => &["married", "de_facto"],
            StatusGroup::Single => &["single", "divorced", "separated", "widowed"],
        }
    }

    pub fn joined_tokens(self) -> String {
        self.tokens().join(",")
    }
}

/// Every status token the engine accepts, in its declared order.
pub const RELATIONSHIP_STATUS_VALUES: [&str; 6] = ["single", "married", "de_facto", "divorced", "separated", "widowed"];

/// Number of dependants a benchmark row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependants {
    Exactly(u32),
    MoreThanThree,
}

impl fmt::Display for Dependants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependants::Exactly(n) => write!(f, "{n}"),
            Dependants::MoreThanThree => write!(f, ">3"),
        }
    }
}

/// A band cell after derivation: a concrete figure or a deferred formula.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchmarkValue {
    Cell(CellValue),
    Formula(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandCell {
    pub label: String,
    pub value: BenchmarkValue,
}

/// A benchmark row with typed metadata and its band cells in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub line: usize,
    pub situation: String,
    /// Raw source area label (siblings are matched on this).
    pub area: String,
    pub region: Region,
    pub status: StatusGroup,
    pub dependants: Dependants,
    pub bands: Vec<BandCell>,
}

impl BenchmarkRow {
    pub fn band(&self, label: &str) -> Option<&BenchmarkValue> {
        self.bands.iter().find(|b| b.label == label).map(|b| &b.value)
    }

    /// Set a band cell, replacing it in place when the label already exists.
    pub fn set_band(&mut self, label: &str, value: BenchmarkValue) {
        match self.bands.iter_mut().find(|b| b.label == label) {
            Some(cell) => cell.value = value,
            None => self.bands.push(BandCell {
                label: label.to_string(),
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_selector_parses_index_or_name() {
        assert_eq!("1".parse::<SheetSelector>().unwrap(), SheetSelector::Index(1));
        assert_eq!(
            "HEM 2024".parse::<SheetSelector>().unwrap(),
            SheetSelector::Name("HEM 2024".to_string())
        );
        assert!("  ".parse::<SheetSelector>().is_err());
    }

    #[test]
    fn band_labels_follow_bounds() {
        let bands = BandConfig::default();
        assert_eq!(bands.upper_range_label(), "[378000..630000[");
        assert_eq!(bands.second_range_label(), "[315000..378000[");
        assert_eq!(bands.beyond_top_label(), ">=630000");
        assert_eq!(bands.midpoint(), 504_000.0);
        assert!(bands.validate().is_ok());
    }

    #[test]
    fn band_bounds_must_descend() {
        let bands = BandConfig {
            upper: 300_000,
            second_upper: 378_000,
            third_upper: 315_000,
        };
        assert!(matches!(bands.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn numbers_display_without_trailing_fraction() {
        assert_eq!(CellValue::Number(2000.0).display_text(), "2000");
        assert_eq!(CellValue::Number(12.5).display_text(), "12.5");
        assert_eq!(CellValue::Text("0800".into()).display_text(), "0800");
    }

    #[test]
    fn require_reports_line_and_column() {
        let row = RowRecord {
            line: 4,
            cells: vec![("area".to_string(), CellValue::Text("Sydney".into()))],
        };
        assert!(row.require("area").is_ok());
        match row.require("situation") {
            Err(AppError::MissingField { line, column }) => {
                assert_eq!(line, 4);
                assert_eq!(column, "situation");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
