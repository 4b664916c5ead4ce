//! Command-line parsing for the decision-table generator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! derivation and emission code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::SheetSelector;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dmngen", version, about = "Generate DMN decision tables from HEM and postcode spreadsheets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the HEM benchmark decision table.
    Hem(HemArgs),
    /// Build the postcode → area decision table.
    Postcode(PostcodeArgs),
}

/// Options shared by both tables.
#[derive(Debug, Args, Clone)]
pub struct IdArgs {
    /// Number rule ids sequentially so repeated runs produce identical files.
    #[arg(long)]
    pub sequential_ids: bool,

    /// Seed for random rule ids (ignored with `--sequential-ids`).
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct HemArgs {
    /// HEM workbook (xlsx/xls/ods) or CSV export.
    #[arg(long, env = "DMNGEN_HEM_INPUT", default_value = "hem-mapping/input_hem.xlsx")]
    pub input: PathBuf,

    /// Sheet index (0-based) or name.
    #[arg(long, default_value = "1")]
    pub sheet: SheetSelector,

    /// Output XML fragment.
    #[arg(long, env = "DMNGEN_HEM_OUTPUT", default_value = "hem-mapping/output.xml")]
    pub output: PathBuf,

    /// Upper bound of the top income band.
    #[arg(long)]
    pub upper_band: Option<u64>,

    /// Upper bound of the second income band (lower bound of the top band).
    #[arg(long)]
    pub second_upper_band: Option<u64>,

    /// Upper bound of the third income band.
    #[arg(long)]
    pub third_upper_band: Option<u64>,

    /// JSON file with `upper`, `second_upper`, `third_upper`; flags override it.
    #[arg(long, value_name = "JSON")]
    pub bands: Option<PathBuf>,

    /// Also write the derived table (after extrapolation) to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_derived: Option<PathBuf>,

    #[command(flatten)]
    pub ids: IdArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PostcodeArgs {
    /// Postcode workbook (xlsx/xls/ods) or CSV export.
    #[arg(long, env = "DMNGEN_POSTCODE_INPUT", default_value = "postcode-mapping/input_au_postcode.xlsx")]
    pub input: PathBuf,

    /// Sheet index (0-based) or name.
    #[arg(long, default_value = "0")]
    pub sheet: SheetSelector,

    /// Output XML fragment.
    #[arg(long, env = "DMNGEN_POSTCODE_OUTPUT", default_value = "output.xml")]
    pub output: PathBuf,

    #[command(flatten)]
    pub ids: IdArgs,
}
