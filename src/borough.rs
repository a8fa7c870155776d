//! The five canonical NYC boroughs and free-text canonicalization.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Borough {
    Bronx,
    Brooklyn,
    Manhattan,
    Queens,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

/// `[[west, south], [east, north]]` in WGS84 degrees.
pub type Bounds = [[f64; 2]; 2];

impl Borough {
    /// Fixed series order used by the charts.
    pub const ALL: [Borough; 5] = [
        Borough::Brooklyn,
        Borough::Manhattan,
        Borough::Bronx,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    /// Maps a raw borough string onto one of the five canonical names.
    ///
    /// Matching is case-insensitive and substring based, checked in a fixed
    /// order. `"New York"` is Manhattan. Anything else yields `None`.
    pub fn canonicalize(raw: &str) -> Option<Borough> {
        let s = raw.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }

        if s.contains("brooklyn") {
            Some(Borough::Brooklyn)
        } else if s.contains("manhattan") || s.contains("new york") {
            Some(Borough::Manhattan)
        } else if s.contains("bronx") {
            Some(Borough::Bronx)
        } else if s.contains("queens") {
            Some(Borough::Queens)
        } else if s.contains("staten") {
            Some(Borough::StatenIsland)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Manhattan => "Manhattan",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
        }
    }

    /// Upper-case label as it appears in the source CSVs.
    pub fn csv_label(&self) -> &'static str {
        match self {
            Borough::Bronx => "BRONX",
            Borough::Brooklyn => "BROOKLYN",
            Borough::Manhattan => "MANHATTAN",
            Borough::Queens => "QUEENS",
            Borough::StatenIsland => "STATEN ISLAND",
        }
    }

    /// Line color for the borough time-series chart.
    pub fn color(&self) -> &'static str {
        match self {
            Borough::Brooklyn => "#49A67A",
            Borough::Manhattan => "#6AA5E8",
            Borough::Bronx => "#F2A65A",
            Borough::Queens => "#C177E4",
            Borough::StatenIsland => "#8C8C8C",
        }
    }

    /// Map fit bounds, `[[west, south], [east, north]]`.
    pub fn bounds(&self) -> Bounds {
        match self {
            Borough::Manhattan => [[-74.0479, 40.6839], [-73.9067, 40.8820]],
            Borough::Brooklyn => [[-74.0419, 40.5707], [-73.8334, 40.7394]],
            Borough::Queens => [[-73.9626, 40.5417], [-73.7004, 40.8007]],
            Borough::Bronx => [[-73.9339, 40.7855], [-73.7654, 40.9153]],
            Borough::StatenIsland => [[-74.2556, 40.4960], [-74.0522, 40.6517]],
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
