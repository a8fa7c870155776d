//! Typed row schemas, one per input file kind.

use crate::borough::Borough;
use crate::period::YearMonth;
use csv::StringRecord;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Declares the header columns a file kind must carry and any row-level
/// checks that serde alone does not express.
pub trait Schema: DeserializeOwned {
    /// Short name used in log fields.
    const KIND: &'static str;
    const REQUIRED: &'static [&'static str];

    fn accepts_headers(headers: &StringRecord) -> bool {
        Self::REQUIRED
            .iter()
            .all(|col| headers.iter().any(|h| h == *col))
    }

    fn is_valid(&self) -> bool {
        true
    }
}

/// `complaints_time_series.csv`: monthly totals and rate per borough.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoroughMonthRow {
    pub borough: String,
    pub year_month: YearMonth,
    pub total_complaints: u64,
    pub complaints_per_10000: f64,
}

impl BoroughMonthRow {
    pub fn canonical_borough(&self) -> Option<Borough> {
        Borough::canonicalize(&self.borough)
    }

    /// Population implied by this row, if the rate allows one.
    pub fn implied_population(&self) -> Option<f64> {
        if self.complaints_per_10000 > 0.0 {
            Some(self.total_complaints as f64 * 10_000.0 / self.complaints_per_10000)
        } else {
            None
        }
    }
}

impl Schema for BoroughMonthRow {
    const KIND: &'static str = "borough_month";
    const REQUIRED: &'static [&'static str] = &[
        "borough",
        "year_month",
        "total_complaints",
        "complaints_per_10000",
    ];

    fn is_valid(&self) -> bool {
        self.complaints_per_10000.is_finite() && self.complaints_per_10000 >= 0.0
    }
}

/// `TopAgencies.csv`: monthly complaint counts per agency.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgencyMonthRow {
    pub month_year: YearMonth,
    pub agency: String,
    pub agency_name: String,
    pub complaint_count: u64,
}

impl Schema for AgencyMonthRow {
    const KIND: &'static str = "agency_month";
    const REQUIRED: &'static [&'static str] =
        &["month_year", "agency", "agency_name", "complaint_count"];
}

/// `top_10_complaint_types_general.csv` and its borough-scoped variant
/// `top_10_complaint_types.csv`, which adds `borough` and `complaint_count`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComplaintTypeRow {
    pub month_year: YearMonth,
    pub complaint_type: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rank: Option<u32>,
    #[serde(default)]
    pub cantidad_reclamos: Option<u64>,
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub complaint_count: Option<u64>,
}

impl ComplaintTypeRow {
    /// Borough-scoped count when present, otherwise the citywide count.
    pub fn count(&self) -> u64 {
        self.complaint_count
            .or(self.cantidad_reclamos)
            .unwrap_or_default()
    }
}

impl Schema for ComplaintTypeRow {
    const KIND: &'static str = "complaint_type";
    const REQUIRED: &'static [&'static str] = &["month_year", "complaint_type"];

    fn accepts_headers(headers: &StringRecord) -> bool {
        let has = |col: &str| headers.iter().any(|h| h == col);
        Self::REQUIRED.iter().all(|c| has(c))
            && (has("cantidad_reclamos") || has("complaint_count"))
    }

    fn is_valid(&self) -> bool {
        self.complaint_count.is_some() || self.cantidad_reclamos.is_some()
    }
}

/// `top_complaint_types.csv`: all-time totals per complaint type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopTypeRow {
    pub complaint_type: String,
    pub total_complaints: u64,
}

impl Schema for TopTypeRow {
    const KIND: &'static str = "top_type";
    const REQUIRED: &'static [&'static str] = &["complaint_type", "total_complaints"];
}

/// `monthly_complaint_type_counts.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeCountRow {
    pub month_year: YearMonth,
    pub complaint_type: String,
    pub complaint_count: u64,
}

impl Schema for TypeCountRow {
    const KIND: &'static str = "type_count";
    const REQUIRED: &'static [&'static str] = &["month_year", "complaint_type", "complaint_count"];
}

/// `AvgResolutionPerAgency.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolutionRow {
    pub month_year: YearMonth,
    pub agency_name: String,
    pub avg_resolution_hours: f64,
}

impl Schema for ResolutionRow {
    const KIND: &'static str = "resolution";
    const REQUIRED: &'static [&'static str] =
        &["month_year", "agency_name", "avg_resolution_hours"];

    fn is_valid(&self) -> bool {
        self.avg_resolution_hours.is_finite()
    }
}
