//! HEM extrapolation rules.
//!
//! 1. More than 3 dependants: HEM guidance is to extend the benchmark by the
//!    step between the 2- and 3-dependant rows of the same area and status:
//!
//!    `benchmark(N) = (b3 - b2) * (N - 3) + b3`
//!
//! 2. Income beyond the top band: scale the step between the two outermost
//!    bands by income relative to the outer band's midpoint:
//!
//!    `benchmark(income) = (income / midpoint) * (outer - second) + second`
//!
//! Both produce formulas over engine variables; nothing is evaluated here.

use crate::domain::{BandConfig, BenchmarkRow, BenchmarkValue, CellValue, Dependants};
use crate::error::AppError;
use crate::formula::{DEPENDANTS_VAR, Expr, MONTHLY_INCOME_VAR};
use crate::transform::format::{format_number, round_printed, to_fixed_2};

/// Replace every band cell of each `>3` row with the dependant formula.
///
/// Siblings are the first rows (in sheet order) with the same status group and
/// the same raw area holding exactly 2 and exactly 3 dependants.
pub fn extrapolate_dependants(rows: &mut [BenchmarkRow]) -> Result<usize, AppError> {
    let mut updates: Vec<(usize, Vec<(String, BenchmarkValue)>)> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if row.dependants != Dependants::MoreThanThree {
            continue;
        }
        let two = find_sibling(rows, row, 2)?;
        let three = find_sibling(rows, row, 3)?;

        let mut cells = Vec::with_capacity(row.bands.len());
        for band in &row.bands {
            let b2 = sibling_figure(row, two, 2, &band.label)?;
            let b3 = sibling_figure(row, three, 3, &band.label)?;
            cells.push((band.label.clone(), BenchmarkValue::Formula(dependants_formula(b2, b3))));
        }
        updates.push((idx, cells));
    }

    let updated = updates.len();
    for (idx, cells) in updates {
        for (label, value) in cells {
            rows[idx].set_band(&label, value);
        }
    }
    tracing::debug!(rows = updated, "extrapolated >3 dependant rows");
    Ok(updated)
}

/// `(round(b3) - round(b2))*(user.numberOfDependants-3) + round(b3)`, each
/// figure rounded as printed.
pub fn dependants_formula(b2: f64, b3: f64) -> Expr {
    let b2 = round_printed(b2);
    let b3 = round_printed(b3);
    Expr::add_spaced(
        Expr::mul(
            Expr::int(b3 - b2),
            Expr::group(Expr::sub(Expr::var(DEPENDANTS_VAR), Expr::int(3))),
        ),
        Expr::int(b3),
    )
}

fn find_sibling<'a>(rows: &'a [BenchmarkRow], row: &BenchmarkRow, n: u32) -> Result<&'a BenchmarkRow, AppError> {
    rows.iter()
        .find(|r| r.status == row.status && r.area == row.area && r.dependants == Dependants::Exactly(n))
        .ok_or_else(|| missing_sibling(row, n, None))
}

fn sibling_figure(row: &BenchmarkRow, sibling: &BenchmarkRow, n: u32, label: &str) -> Result<f64, AppError> {
    let cell = match sibling.band(label) {
        Some(BenchmarkValue::Cell(cell)) => cell,
        // Siblings hold exact counts, so they never carry formulas.
        Some(BenchmarkValue::Formula(_)) | None => return Err(missing_sibling(row, n, Some(label))),
    };
    // Text figures may carry thousands separators.
    let text = format_number(cell);
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::NonNumericBenchmark {
            line: sibling.line,
            column: label.to_string(),
            value: match cell {
                CellValue::Text(s) => s.clone(),
                CellValue::Number(_) => text.clone(),
            },
        })
}

fn missing_sibling(row: &BenchmarkRow, n: u32, column: Option<&str>) -> AppError {
    AppError::MissingSiblingBenchmark {
        line: row.line,
        area: row.area.clone(),
        status: row.status.tokens().join(", "),
        dependants: n,
        column: column.map(str::to_string),
    }
}

/// Add the open-ended top band (`>=UPPER`) to every row.
///
/// Runs after `extrapolate_dependants`, so `>3` rows nest their dependant
/// formulas inside this one.
pub fn extrapolate_beyond_top_band(rows: &mut [BenchmarkRow], bands: &BandConfig) -> Result<(), AppError> {
    let outer_label = bands.upper_range_label();
    let second_label = bands.second_range_label();
    let target_label = bands.beyond_top_label();
    let midpoint = to_fixed_2(bands.midpoint());

    for row in rows.iter_mut() {
        let outer = band_operand(row, &outer_label)?;
        let second = band_operand(row, &second_label)?;
        let formula = beyond_top_formula(&midpoint, outer, second);
        row.set_band(&target_label, BenchmarkValue::Formula(formula));
    }
    Ok(())
}

/// `(finalVerifiedIncome*12/MID)*((OUTER)-(SECOND))+(SECOND)`
pub fn beyond_top_formula(midpoint: &str, outer: Expr, second: Expr) -> Expr {
    let annual_over_mid = Expr::group(Expr::div(
        Expr::mul(Expr::var(MONTHLY_INCOME_VAR), Expr::int(12)),
        Expr::lit(midpoint),
    ));
    let step = Expr::group(Expr::sub(Expr::group(outer), Expr::group(second.clone())));
    Expr::add(Expr::mul(annual_over_mid, step), Expr::group(second))
}

fn band_operand(row: &BenchmarkRow, label: &str) -> Result<Expr, AppError> {
    match row.band(label) {
        Some(BenchmarkValue::Cell(cell)) => Ok(Expr::lit(format_number(cell))),
        Some(BenchmarkValue::Formula(expr)) => Ok(expr.clone()),
        None => Err(AppError::MissingBandColumn {
            line: row.line,
            column: label.to_string(),
        }),
    }
}
