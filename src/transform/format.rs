//! Number formatting for figures embedded in rule text.
//!
//! Text cells lose their thousands separators; numeric cells are fixed to two
//! decimals with exact ties rounded away from zero (the engine-side tables were
//! historically produced with JavaScript's `toFixed(2)`, and regenerated tables
//! must not drift by a cent).

use crate::domain::CellValue;

pub fn format_number(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.replace(',', ""),
        CellValue::Number(v) => to_fixed_2(*v),
    }
}

/// Two-decimal fixed formatting with ties away from zero.
pub fn to_fixed_2(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    match tie_rounded_cents(value.abs()) {
        Some(cents) => {
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{sign}{}.{:02}", cents / 100, cents % 100)
        }
        None => format!("{value:.2}"),
    }
}

/// If `magnitude` lies exactly halfway between two cent values, return the
/// upper one (in cents).
fn tie_rounded_cents(magnitude: f64) -> Option<u128> {
    // Wide enough to show every significant fractional digit of the doubles
    // we meet in benchmark tables.
    let exact = format!("{magnitude:.60}");
    let (int_part, frac) = exact.split_once('.')?;
    let frac = frac.as_bytes();
    if frac[2] != b'5' || frac[3..].iter().any(|&b| b != b'0') {
        return None;
    }
    if int_part.len() > 30 {
        return None;
    }
    let whole: u128 = int_part.parse().ok()?;
    let hundredths = u128::from(frac[0] - b'0') * 10 + u128::from(frac[1] - b'0');
    Some(whole * 100 + hundredths + 1)
}

/// Round a figure the way the table prints it: fixed to two decimals first,
/// then `js_round`. `1275.499` prints as `1275.50` and rounds to 1276.
pub fn round_printed(value: f64) -> i64 {
    let printed = to_fixed_2(value).parse::<f64>().unwrap_or(value);
    js_round(printed) as i64
}

/// `Math.round` semantics: nearest integer, ties toward positive infinity.
pub fn js_round(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_loses_thousands_separators() {
        assert_eq!(format_number(&CellValue::Text("1,276".into())), "1276");
        assert_eq!(format_number(&CellValue::Text("12,345.6".into())), "12345.6");
    }

    #[test]
    fn numbers_fix_to_two_decimals() {
        assert_eq!(format_number(&CellValue::Number(500.004)), "500.00");
        assert_eq!(format_number(&CellValue::Number(1276.0)), "1276.00");
        assert_eq!(to_fixed_2(504_000.0), "504000.00");
        assert_eq!(to_fixed_2(-3.456), "-3.46");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(to_fixed_2(0.125), "0.13");
        assert_eq!(to_fixed_2(1.375), "1.38");
        assert_eq!(to_fixed_2(-0.125), "-0.13");
        // 1.005 is stored slightly below the tie.
        assert_eq!(to_fixed_2(1.005), "1.00");
    }

    #[test]
    fn js_round_ties_go_up() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(1275.49), 1275.0);
        assert_eq!(js_round(0.49999999999999994), 0.0);
    }

    #[test]
    fn round_printed_rounds_the_two_decimal_figure() {
        assert_eq!(round_printed(1275.499), 1276);
        assert_eq!(round_printed(1275.494), 1275);
        assert_eq!(round_printed(1224.2), 1224);
    }
}
