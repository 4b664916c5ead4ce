//! Terminal run summary.

use chrono::{DateTime, Local};

use crate::app::pipeline::RunOutput;

/// Format the summary printed after a successful run.
pub fn format_run_summary(run: &RunOutput, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== dmngen - {} decision table ===\n", run.table.display_name()));
    out.push_str(&format!("Input: {} (sheet {})\n", run.input.display(), run.sheet));
    out.push_str(&format!("Rows: {}\n", run.rows_read));
    out.push_str(&format!("Rules: {}\n", run.rules));
    out.push_str(&format!("Output: {}\n", run.output.display()));
    if let Some(path) = &run.derived_export {
        out.push_str(&format!("Derived table: {}\n", path.display()));
    }
    out.push_str(&format!("Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S")));

    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::TimeZone;

    use super::*;
    use crate::dmn::TableKind;
    use crate::domain::SheetSelector;

    #[test]
    fn summary_lists_counts_and_paths() {
        let run = RunOutput {
            table: TableKind::Postcode,
            input: PathBuf::from("postcodes.xlsx"),
            sheet: SheetSelector::Index(0),
            output: PathBuf::from("output.xml"),
            rows_read: 2,
            rules: 2,
            derived_export: None,
        };
        let at = Local.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap();
        assert_eq!(
            format_run_summary(&run, at),
            "=== dmngen - postcode area decision table ===\n\
             Input: postcodes.xlsx (sheet #0)\n\
             Rows: 2\n\
             Rules: 2\n\
             Output: output.xml\n\
             Generated: 2024-07-01 09:30:00\n"
        );
    }
}
