//! Canonical regions and the source-label lookup table.

use std::fmt;

use crate::error::AppError;

/// Canonical region as the rule engine names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Sydney,
    RestOfNsw,
    Melbourne,
    RestOfVic,
    Brisbane,
    RestOfQld,
    Perth,
    RestOfWa,
    Adelaide,
    RestOfSa,
    Hobart,
    RestOfTas,
    Darwin,
    RestOfNt,
    Canberra,
    OtherTerritories,
}

impl Region {
    /// All regions in the order the decision tables declare them.
    pub const ALL: [Region; 16] = [
        Region::Sydney,
        Region::RestOfNsw,
        Region::Melbourne,
        Region::RestOfVic,
        Region::Brisbane,
        Region::RestOfQld,
        Region::Perth,
        Region::RestOfWa,
        Region::Adelaide,
        Region::RestOfSa,
        Region::Hobart,
        Region::RestOfTas,
        Region::Darwin,
        Region::RestOfNt,
        Region::Canberra,
        Region::OtherTerritories,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Region::Sydney => "Sydney",
            Region::RestOfNsw => "Rest of NSW",
            Region::Melbourne => "Melbourne",
            Region::RestOfVic => "Rest of VIC",
            Region::Brisbane => "Brisbane",
            Region::RestOfQld => "Rest of QLD",
            Region::Perth => "Perth",
            Region::RestOfWa => "Rest of WA",
            Region::Adelaide => "Adelaide",
            Region::RestOfSa => "Rest of SA",
            Region::Hobart => "Hobart",
            Region::RestOfTas => "Rest of TAS",
            Region::Darwin => "Darwin",
            Region::RestOfNt => "Rest of NT",
            Region::Canberra => "Canberra",
            Region::OtherTerritories => "Other Territories",
        }
    }

    /// Map a raw label from the HEM / ABS sheets. Matching is exact.
    pub fn from_source_label(raw: &str) -> Option<Region> {
        let region = match raw {
            "Australia" => Region::OtherTerritories,
            "Sydney" => Region::Sydney,
            "Balance of NSW" => Region::RestOfNsw,
            "Melbourne" => Region::Melbourne,
            "Balance of VIC" => Region::RestOfVic,
            "Brisbane" => Region::Brisbane,
            "Balance of QLD" => Region::RestOfQld,
            "Perth" => Region::Perth,
            "Balance of WA" => Region::RestOfWa,
            "Adelaide" => Region::Adelaide,
            "Balance of SA" => Region::RestOfSa,
            "Hobart" => Region::Hobart,
            "Balance of TAS" => Region::RestOfTas,
            "NT" => Region::Darwin,
            "ACT" => Region::Canberra,
            "Balance of NT" => Region::RestOfNt,
            _ => return None,
        };
        Some(region)
    }

    /// Quoted, comma-separated display names (`"Sydney","Rest of NSW",...`).
    pub fn quoted_value_list() -> String {
        Region::ALL
            .iter()
            .map(|r| format!("\"{}\"", r.display_name()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Normalize a raw region label, failing with `UnmappedRegion` on a miss.
pub fn normalize_region(line: usize, raw: &str) -> Result<Region, AppError> {
    Region::from_source_label(raw).ok_or_else(|| AppError::UnmappedRegion {
        line,
        region: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const SOURCE_LABELS: [&str; 16] = [
        "Australia",
        "Sydney",
        "Balance of NSW",
        "Melbourne",
        "Balance of VIC",
        "Brisbane",
        "Balance of QLD",
        "Perth",
        "Balance of WA",
        "Adelaide",
        "Balance of SA",
        "Hobart",
        "Balance of TAS",
        "NT",
        "ACT",
        "Balance of NT",
    ];

    #[test]
    fn every_source_label_maps_to_a_distinct_region() {
        let mapped: HashSet<Region> = SOURCE_LABELS
            .iter()
            .map(|l| Region::from_source_label(l).unwrap())
            .collect();
        assert_eq!(mapped.len(), SOURCE_LABELS.len());
        assert_eq!(mapped.len(), Region::ALL.len());
    }

    #[test]
    fn renamed_labels() {
        assert_eq!(Region::from_source_label("NT").unwrap().display_name(), "Darwin");
        assert_eq!(Region::from_source_label("ACT").unwrap().display_name(), "Canberra");
        assert_eq!(
            Region::from_source_label("Australia").unwrap().display_name(),
            "Other Territories"
        );
    }

    #[test]
    fn unknown_label_is_an_error() {
        match normalize_region(12, "sydney") {
            Err(AppError::UnmappedRegion { line, region }) => {
                assert_eq!(line, 12);
                assert_eq!(region, "sydney");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn value_list_matches_declared_order() {
        assert_eq!(
            Region::quoted_value_list(),
            "\"Sydney\",\"Rest of NSW\",\"Melbourne\",\"Rest of VIC\",\"Brisbane\",\"Rest of QLD\",\"Perth\",\"Rest of WA\",\"Adelaide\",\"Rest of SA\",\"Hobart\",\"Rest of TAS\",\"Darwin\",\"Rest of NT\",\"Canberra\",\"Other Territories\""
        );
    }
}
