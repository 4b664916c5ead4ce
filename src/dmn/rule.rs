//! Rule emission for both decision tables.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::{BenchmarkRow, BenchmarkValue, Dependants, RowRecord, normalize_region};
use crate::error::AppError;
use crate::transform::format_number;

/// Comparison operators as they must appear inside the XML text nodes.
pub const COMPARISON_OPERATORS: [(&str, &str); 5] = [
    (">=", "&gt;="),
    ("<=", "&lt;="),
    (">", "&gt;"),
    ("<", "&lt;"),
    ("=", "="),
];

static OPERATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<=|>=|<|>|=").expect("static regex"));

pub const POSTCODE_COLUMN: &str = "POSTCODE_2011";
pub const REGION_NAME_COLUMN: &str = "GCCSA_NAME_2011";

/// One decision rule: input entry texts in clause order, then the output text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub inputs: Vec<String>,
    pub output: String,
}

/// Escape comparison operators in a band label (`>=630000` → `&gt;=630000`).
pub fn escape_comparison(label: &str) -> String {
    OPERATOR
        .replace_all(label, |caps: &Captures<'_>| {
            let op = &caps[0];
            COMPARISON_OPERATORS
                .iter()
                .find(|(raw, _)| *raw == op)
                .map(|(_, escaped)| (*escaped).to_string())
                .unwrap_or_else(|| op.to_string())
        })
        .into_owned()
}

/// `"married", "de_facto"`
pub fn status_condition(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|t| format!("\"{t}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn dependants_condition(dependants: Dependants) -> String {
    escape_comparison(&dependants.to_string())
}

pub fn output_text(value: &BenchmarkValue) -> String {
    match value {
        BenchmarkValue::Cell(cell) => format_number(cell),
        BenchmarkValue::Formula(expr) => expr.render(),
    }
}

/// One rule per band cell, rows in sheet order, cells in column order.
pub fn emit_benchmark_rules(rows: &[BenchmarkRow]) -> Vec<Rule> {
    let mut rules = Vec::new();
    for row in rows {
        let region = format!("\"{}\"", row.region.display_name());
        let status = status_condition(row.status.tokens());
        let dependants = dependants_condition(row.dependants);

        for band in &row.bands {
            rules.push(Rule {
                inputs: vec![
                    escape_comparison(&band.label),
                    region.clone(),
                    status.clone(),
                    dependants.clone(),
                ],
                output: output_text(&band.value),
            });
        }
    }
    rules
}

/// One rule per postcode row: `"<postcode>"` → `"<region>"`.
pub fn emit_postcode_rules(records: &[RowRecord]) -> Result<Vec<Rule>, AppError> {
    records
        .iter()
        .map(|record| {
            let postcode = record.require(POSTCODE_COLUMN)?.display_text();
            let raw_region = record.require(REGION_NAME_COLUMN)?.display_text();
            let region = normalize_region(record.line, &raw_region)?;
            Ok(Rule {
                inputs: vec![format!("\"{postcode}\"")],
                output: format!("\"{}\"", region.display_name()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BandCell, CellValue, Region, StatusGroup};
    use crate::formula::Expr;

    #[test]
    fn escapes_operators() {
        assert_eq!(escape_comparison(">=630000"), "&gt;=630000");
        assert_eq!(escape_comparison("<20000"), "&lt;20000");
        assert_eq!(escape_comparison("<=5"), "&lt;=5");
        assert_eq!(escape_comparison("[378000..630000["), "[378000..630000[");
        assert_eq!(dependants_condition(Dependants::MoreThanThree), "&gt;3");
        assert_eq!(dependants_condition(Dependants::Exactly(2)), "2");
    }

    #[test]
    fn status_alternation_is_quoted_and_comma_joined() {
        assert_eq!(status_condition(StatusGroup::Coupled.tokens()), "\"married\", \"de_facto\"");
        assert_eq!(
            status_condition(StatusGroup::Single.tokens()),
            "\"single\", \"divorced\", \"separated\", \"widowed\""
        );
    }

    #[test]
    fn benchmark_rule_for_a_plain_row() {
        let row = BenchmarkRow {
            line: 2,
            situation: "Couple with 1 dependant".into(),
            area: "Sydney".into(),
            region: Region::Sydney,
            status: StatusGroup::Coupled,
            dependants: Dependants::Exactly(1),
            bands: vec![
                BandCell {
                    label: "[378000..630000[".into(),
                    value: BenchmarkValue::Cell(CellValue::Number(500.004)),
                },
                BandCell {
                    label: ">=630000".into(),
                    value: BenchmarkValue::Formula(Expr::lit("1")),
                },
            ],
        };
        let rules = emit_benchmark_rules(&[row]);
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0],
            Rule {
                inputs: vec![
                    "[378000..630000[".into(),
                    "\"Sydney\"".into(),
                    "\"married\", \"de_facto\"".into(),
                    "1".into(),
                ],
                output: "500.00".into(),
            }
        );
        assert_eq!(rules[1].inputs[0], "&gt;=630000");
        assert_eq!(rules[1].output, "1");
    }

    #[test]
    fn postcode_rule() {
        let record = RowRecord {
            line: 2,
            cells: vec![
                (POSTCODE_COLUMN.to_string(), CellValue::Number(2000.0)),
                (REGION_NAME_COLUMN.to_string(), CellValue::Text("Sydney".into())),
            ],
        };
        let rules = emit_postcode_rules(&[record]).unwrap();
        assert_eq!(
            rules,
            vec![Rule {
                inputs: vec!["\"2000\"".into()],
                output: "\"Sydney\"".into(),
            }]
        );
    }

    #[test]
    fn postcode_with_unknown_region_fails() {
        let record = RowRecord {
            line: 9,
            cells: vec![
                (POSTCODE_COLUMN.to_string(), CellValue::Text("0872".into())),
                (REGION_NAME_COLUMN.to_string(), CellValue::Text("Migratory".into())),
            ],
        };
        assert!(matches!(
            emit_postcode_rules(&[record]),
            Err(AppError::UnmappedRegion { line: 9, .. })
        ));
    }
}
