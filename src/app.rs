//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments into resolved run configs
//! - runs the selected pipeline
//! - prints the run summary

use clap::Parser;

use crate::cli::{Command, HemArgs, IdArgs, PostcodeArgs};
use crate::domain::BandConfig;
use crate::error::AppError;

pub mod pipeline;

use pipeline::{HemConfig, IdMode, PostcodeConfig};

/// Entry point for the `dmngen` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    crate::logging::init_logging();

    let cli = crate::cli::Cli::parse();

    let output = match cli.command {
        Command::Hem(args) => pipeline::run_hem(&hem_config_from_args(&args)?)?,
        Command::Postcode(args) => pipeline::run_postcode(&postcode_config_from_args(&args))?,
    };

    println!("{}", crate::report::format_run_summary(&output, chrono::Local::now()));
    Ok(())
}

/// Resolve band bounds: defaults, then the JSON file, then individual flags.
pub fn hem_config_from_args(args: &HemArgs) -> Result<HemConfig, AppError> {
    let mut bands = match &args.bands {
        Some(path) => crate::io::read_band_config(path)?,
        None => BandConfig::default(),
    };
    if let Some(v) = args.upper_band {
        bands.upper = v;
    }
    if let Some(v) = args.second_upper_band {
        bands.second_upper = v;
    }
    if let Some(v) = args.third_upper_band {
        bands.third_upper = v;
    }
    bands.validate()?;

    Ok(HemConfig {
        input: args.input.clone(),
        sheet: args.sheet.clone(),
        output: args.output.clone(),
        bands,
        export_derived: args.export_derived.clone(),
        ids: id_mode(&args.ids),
    })
}

pub fn postcode_config_from_args(args: &PostcodeArgs) -> PostcodeConfig {
    PostcodeConfig {
        input: args.input.clone(),
        sheet: args.sheet.clone(),
        output: args.output.clone(),
        ids: id_mode(&args.ids),
    }
}

fn id_mode(args: &IdArgs) -> IdMode {
    if args.sequential_ids {
        IdMode::Sequential
    } else {
        IdMode::Random { seed: args.seed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn hem_args(argv: &[&str]) -> HemArgs {
        let mut full = vec!["dmngen", "hem"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Hem(args) => args,
            Command::Postcode(_) => panic!("expected hem"),
        }
    }

    #[test]
    fn band_flags_override_defaults() {
        let config = hem_config_from_args(&hem_args(&["--upper-band", "700000"])).unwrap();
        assert_eq!(config.bands.upper, 700_000);
        assert_eq!(config.bands.second_upper, 378_000);
        assert_eq!(config.ids, IdMode::Random { seed: None });
    }

    #[test]
    fn inconsistent_band_flags_are_rejected() {
        let result = hem_config_from_args(&hem_args(&["--second-upper-band", "700000"]));
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn sequential_flag_wins_over_seed() {
        let config = hem_config_from_args(&hem_args(&["--sequential-ids", "--seed", "3"])).unwrap();
        assert_eq!(config.ids, IdMode::Sequential);
    }
}
