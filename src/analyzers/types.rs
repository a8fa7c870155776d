//! Chart payloads produced by the visualization pipelines.

use crate::analyzers::color::{Domain, Rgb};
use crate::analyzers::rank::Ranking;
use crate::borough::Borough;
use crate::period::{CovidWindow, YearMonth};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Wrapper written around every exported chart document.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub chart: &'static str,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(chart: &'static str, data: T) -> Self {
        Self {
            schema_version: 1,
            generated_at: Utc::now(),
            chart,
            data,
        }
    }
}

/// One bar of the overview's top complaint types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeBar {
    pub complaint_type: String,
    pub label: String,
    /// `label` wrapped for the category axis.
    pub lines: Vec<String>,
    pub total_complaints: u64,
}

/// Headline figures, monthly sparkline and top complaint types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverSummary {
    pub total_complaints: u64,
    pub avg_yearly: f64,
    pub avg_monthly: f64,
    /// Every month counted as 30 days.
    pub avg_daily: f64,
    pub months: Vec<String>,
    pub sparkline: Vec<u64>,
    pub top_types: Vec<TypeBar>,
}

/// Optional borough and year restriction applied before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub borough: Option<Borough>,
    pub year: Option<String>,
}

/// Per-borough figures shown on the map and its tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughStats {
    pub borough: Borough,
    pub total_complaints: u64,
    pub population: Option<f64>,
    pub rate_per_10k: f64,
    pub median_monthly_rate: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughSummary {
    pub domain: Option<Domain>,
    pub boroughs: Vec<BoroughStats>,
    pub fill_expression: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    Absolute,
    PerCapita,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughLine {
    pub borough: Borough,
    pub color: &'static str,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub mode: ViewMode,
    pub months: Vec<YearMonth>,
    pub series: Vec<BoroughLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BumpLine {
    pub category: String,
    pub label: String,
    pub ranks: Vec<Option<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BumpChart {
    pub periods: Vec<String>,
    pub ranking: Ranking,
    pub lines: Vec<BumpLine>,
    /// Wrapped axis labels by rank for the first and last period.
    pub start_labels: Vec<String>,
    pub end_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyBar {
    pub agency: String,
    pub agency_name: String,
    pub display_name: String,
    pub complaint_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyFrame {
    pub month: YearMonth,
    pub bars: Vec<AgencyBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowCell {
    pub borough: Borough,
    pub total_complaints: u64,
    pub population: f64,
    pub rate_per_10k: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowMap {
    pub window: CovidWindow,
    pub label: &'static str,
    pub cells: Vec<WindowCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CovidMaps {
    pub domain: Option<Domain>,
    pub windows: Vec<WindowMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordWeight {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRatePoint {
    pub year_month: YearMonth,
    pub pre: Option<f64>,
    pub covid: Option<f64>,
    pub post: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionSeries {
    pub agency_name: String,
    pub display_name: String,
    pub points: Vec<(YearMonth, f64)>,
    pub mean_hours: f64,
}

/// Everything the COVID section renders, from two input files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CovidSection {
    pub maps: CovidMaps,
    pub word_clouds: BTreeMap<CovidWindow, Vec<WordWeight>>,
    pub city_series: Vec<CityRatePoint>,
}
