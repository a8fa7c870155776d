use crate::analyzers::aggregate::{aggregate, estimate_populations, sum_by_month, sum_by_year};
use crate::analyzers::color::{Domain, choropleth};
use crate::analyzers::rank::{rank_top_n, top_n};
use crate::analyzers::types::{
    AgencyBar, AgencyFrame, BoroughLine, BoroughStats, BoroughSummary, BumpChart, BumpLine,
    CoverSummary, Filter, ResolutionSeries, TimeSeries, TypeBar, ViewMode,
};
use crate::analyzers::utility::{mean, median, per_capita};
use crate::borough::Borough;
use crate::boundaries::fill_expression;
use crate::period::YearMonth;
use crate::records::{
    AgencyMonthRow, BoroughMonthRow, ComplaintTypeRow, ResolutionRow, TopTypeRow,
};
use crate::translate::{
    title_case, translate_agency_name, translate_complaint_type, wrap_label, wrap_words,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Ranks shown on the complaint-type bump chart.
pub const BUMP_TOP_N: usize = 6;
/// Bars in the overview's top complaint types chart.
pub const COVER_TOP_N: usize = 8;
/// Characters per line of a wrapped overview bar label.
const COVER_LABEL_WIDTH: usize = 16;
const DAYS_PER_MONTH: f64 = 30.0;

/// Bars per frame in the agency bar race.
pub const RACE_TOP_N: usize = 15;

/// Agencies given their own panel in the resolution-time small multiples.
pub const FEATURED_AGENCIES: [&str; 5] = [
    "New York City Police Department",
    "Department of Housing Preservation and Development",
    "Department of Sanitation",
    "Department of Transportation",
    "Department of Environmental Protection",
];

/// Overview figures: overall total, yearly/monthly/daily averages over the
/// months present, the citywide monthly sparkline and the top complaint types.
///
/// Rows count toward the totals whatever their borough value.
#[tracing::instrument(skip(rows, types), fields(rows = rows.len(), types = types.len()))]
pub fn cover_summary(rows: &[BoroughMonthRow], types: &[TopTypeRow]) -> CoverSummary {
    let by_month = sum_by_month(rows);
    let years = sum_by_year(rows).len();
    let total = by_month.values().fold(0u64, |acc, v| acc.saturating_add(*v));

    let average = |periods: f64| {
        if periods > 0.0 {
            total as f64 / periods
        } else {
            0.0
        }
    };
    let months = by_month.len() as f64;

    let top_types = top_n(
        types
            .iter()
            .map(|t| (t.complaint_type.clone(), t.total_complaints)),
        COVER_TOP_N,
    )
    .into_iter()
    .map(|e| {
        let label = title_case(&translate_complaint_type(&e.category)).replacen("- ", "", 1);
        TypeBar {
            lines: wrap_words(&label, COVER_LABEL_WIDTH),
            label,
            complaint_type: e.category,
            total_complaints: e.count,
        }
    })
    .collect::<Vec<_>>();

    info!(
        total,
        months = by_month.len(),
        years,
        top_types = top_types.len(),
        "Cover summary computed"
    );

    CoverSummary {
        total_complaints: total,
        avg_yearly: average(years as f64),
        avg_monthly: average(months),
        avg_daily: average(months * DAYS_PER_MONTH),
        sparkline: by_month.values().copied().collect(),
        months: by_month.into_keys().collect(),
        top_types,
    }
}

/// Map figures per borough: total, fixed population, combined rate and the
/// median of the monthly published rates, shaded on one shared domain.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn borough_summary(rows: &[BoroughMonthRow], filter: &Filter) -> BoroughSummary {
    let selected: Vec<&BoroughMonthRow> = rows
        .iter()
        .filter(|r| {
            filter
                .year
                .as_deref()
                .is_none_or(|y| r.year_month.year_key() == y)
        })
        .filter(|r| {
            filter
                .borough
                .is_none_or(|b| r.canonical_borough() == Some(b))
        })
        .collect();

    let totals = aggregate(&selected, |r| r.canonical_borough(), |r| r.total_complaints);
    let populations = estimate_populations(selected.iter().copied());

    let mut monthly_rates: BTreeMap<Borough, Vec<f64>> = BTreeMap::new();
    for r in &selected {
        if let Some(b) = r.canonical_borough() {
            monthly_rates.entry(b).or_default().push(r.complaints_per_10000);
        }
    }

    let rates: BTreeMap<Borough, f64> = totals
        .iter()
        .map(|(b, total)| {
            let pop = populations.get(b).copied().unwrap_or_default();
            (*b, per_capita(*total as f64, pop))
        })
        .collect();

    let domain = Domain::from_values(rates.values().copied());
    let colors: BTreeMap<Borough, _> = match domain {
        Some(d) => rates.iter().map(|(b, v)| (*b, choropleth(*v, d))).collect(),
        None => BTreeMap::new(),
    };

    let boroughs = totals
        .iter()
        .filter_map(|(b, total)| {
            Some(BoroughStats {
                borough: *b,
                total_complaints: *total,
                population: populations.get(b).copied(),
                rate_per_10k: rates[b],
                median_monthly_rate: median(monthly_rates.get(b).map_or(&[][..], Vec::as_slice)),
                color: *colors.get(b)?,
            })
        })
        .collect::<Vec<_>>();

    info!(boroughs = boroughs.len(), "Borough summary computed");

    BoroughSummary {
        domain,
        boroughs,
        fill_expression: fill_expression(&colors),
    }
}

/// Monthly line per borough, absolute counts or the published rate.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn borough_time_series(rows: &[BoroughMonthRow], mode: ViewMode) -> TimeSeries {
    let mut by_month: BTreeMap<YearMonth, BTreeMap<Borough, f64>> = BTreeMap::new();
    for r in rows {
        let Some(b) = r.canonical_borough() else {
            continue;
        };
        let value = match mode {
            ViewMode::Absolute => r.total_complaints as f64,
            ViewMode::PerCapita => r.complaints_per_10000,
        };
        // Later rows for the same month and borough replace earlier ones.
        by_month.entry(r.year_month).or_default().insert(b, value);
    }

    let series = Borough::ALL
        .iter()
        .map(|b| BoroughLine {
            borough: *b,
            color: b.color(),
            values: by_month.values().map(|m| m.get(b).copied()).collect(),
        })
        .collect();

    TimeSeries {
        mode,
        months: by_month.into_keys().collect(),
        series,
    }
}

/// Complaint types ranked per year, or per month inside `drill_year`.
///
/// With a `borough`, only rows whose raw borough column equals it
/// (case-insensitively) are used.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn complaint_type_bump(
    rows: &[ComplaintTypeRow],
    borough: Option<&str>,
    drill_year: Option<&str>,
) -> BumpChart {
    let scoped: Vec<&ComplaintTypeRow> = rows
        .iter()
        .filter(|r| match borough {
            Some(sel) => r
                .borough
                .as_deref()
                .unwrap_or_default()
                .eq_ignore_ascii_case(sel),
            None => true,
        })
        .collect();

    let ranking = rank_top_n(
        &scoped,
        |r| match drill_year {
            Some(y) => (r.month_year.year_key() == y).then(|| r.month_year.month_key()),
            None => Some(r.month_year.year_key()),
        },
        |r| r.complaint_type.clone(),
        |r| r.count(),
        BUMP_TOP_N,
    );

    let lines = ranking
        .series()
        .into_iter()
        .map(|s| BumpLine {
            label: title_case(&translate_complaint_type(&s.category)),
            category: s.category,
            ranks: s.ranks,
        })
        .collect();

    let wrap = |labels: Vec<String>| -> Vec<String> {
        labels
            .iter()
            .map(|l| wrap_label(&translate_complaint_type(l)))
            .collect()
    };

    debug!(periods = ranking.periods.len(), "Bump chart ranked");

    BumpChart {
        periods: ranking.period_keys(),
        start_labels: wrap(ranking.first_labels()),
        end_labels: wrap(ranking.last_labels()),
        lines,
        ranking,
    }
}

/// One frame per month with the busiest agencies, largest first.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn agency_race(rows: &[AgencyMonthRow], top: usize) -> Vec<AgencyFrame> {
    let mut by_month: BTreeMap<YearMonth, Vec<&AgencyMonthRow>> = BTreeMap::new();
    for r in rows {
        by_month.entry(r.month_year).or_default().push(r);
    }

    by_month
        .into_iter()
        .map(|(month, month_rows)| {
            let names: BTreeMap<&str, &str> = month_rows
                .iter()
                .map(|r| (r.agency.as_str(), r.agency_name.as_str()))
                .collect();
            let ranked = top_n(
                month_rows
                    .iter()
                    .map(|r| (r.agency.clone(), r.complaint_count)),
                top,
            );

            let bars = ranked
                .into_iter()
                .map(|e| {
                    let agency_name = names.get(e.category.as_str()).copied().unwrap_or_default();
                    AgencyBar {
                        display_name: translate_agency_name(agency_name),
                        agency_name: agency_name.to_string(),
                        agency: e.category,
                        complaint_count: e.count,
                    }
                })
                .collect();

            AgencyFrame { month, bars }
        })
        .collect()
}

/// Monthly average resolution hours for each of `agencies`, in order.
/// Agencies with no rows get an empty series.
#[tracing::instrument(skip(rows, agencies), fields(rows = rows.len()))]
pub fn resolution_series(rows: &[ResolutionRow], agencies: &[&str]) -> Vec<ResolutionSeries> {
    let wanted: BTreeSet<&str> = agencies.iter().copied().collect();
    let mut grouped: BTreeMap<&str, BTreeMap<YearMonth, f64>> = BTreeMap::new();
    for r in rows {
        if wanted.contains(r.agency_name.as_str()) {
            grouped
                .entry(r.agency_name.as_str())
                .or_default()
                .insert(r.month_year, r.avg_resolution_hours);
        }
    }

    agencies
        .iter()
        .map(|name| {
            let points: Vec<(YearMonth, f64)> = grouped
                .get(name)
                .map(|m| m.iter().map(|(k, v)| (*k, *v)).collect())
                .unwrap_or_default();
            let hours: Vec<f64> = points.iter().map(|(_, h)| *h).collect();
            ResolutionSeries {
                agency_name: name.to_string(),
                display_name: translate_agency_name(name),
                mean_hours: mean(&hours),
                points,
            }
        })
        .collect()
}
