//! Deferred-evaluation formulas embedded in decision-table output cells.
//!
//! The rule engine evaluates these at decision time; we only build, render and
//! (for tests) evaluate them.

pub mod expr;

pub use expr::*;

/// Engine variable holding the caller's actual number of dependants.
pub const DEPENDANTS_VAR: &str = "user.numberOfDependants";

/// Engine variable holding the verified monthly income.
pub const MONTHLY_INCOME_VAR: &str = "finalVerifiedIncome";
