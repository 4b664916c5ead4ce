//! DMN decision-table output: rules, node ids and the document templates.

pub mod document;
pub mod ids;
pub mod rule;

pub use document::*;
pub use ids::*;
pub use rule::*;
