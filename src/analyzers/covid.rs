//! Pre / during / post COVID comparisons.

use crate::analyzers::aggregate::{Accumulate, estimate_populations};
use crate::analyzers::color::{Domain, Rgb, shade};
use crate::analyzers::rank::top_n;
use crate::analyzers::types::{
    CityRatePoint, CovidMaps, CovidSection, WindowCell, WindowMap, WordWeight,
};
use crate::analyzers::utility::per_capita;
use crate::borough::Borough;
use crate::period::{CovidWindow, YearMonth};
use crate::records::{BoroughMonthRow, TypeCountRow};
use crate::translate::{title_case, translate_complaint_type};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Complaint types shown per word cloud.
pub const WORD_CLOUD_TOP_N: usize = 10;

/// Borough rates per window, shaded toward each window's color on a domain
/// shared by all three maps.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn covid_maps(rows: &[BoroughMonthRow]) -> CovidMaps {
    let populations = estimate_populations(rows);

    let mut sums: BTreeMap<CovidWindow, BTreeMap<Borough, u64>> = BTreeMap::new();
    for r in rows {
        let (Some(b), Some(w)) = (r.canonical_borough(), CovidWindow::of(r.year_month)) else {
            continue;
        };
        sums.entry(w)
            .or_default()
            .entry(b)
            .or_default()
            .accumulate(r.total_complaints);
    }

    let rate = |b: &Borough, sum: u64| {
        per_capita(sum as f64, populations.get(b).copied().unwrap_or_default())
    };

    let domain = Domain::from_values(
        sums.values()
            .flat_map(|m| m.iter().map(|(b, s)| rate(b, *s))),
    );

    let windows = CovidWindow::ALL
        .iter()
        .map(|w| {
            let target: Rgb = w.color().parse().unwrap_or(Rgb::NO_DATA);
            let cells = sums
                .get(w)
                .into_iter()
                .flatten()
                .map(|(b, sum)| {
                    let rate_per_10k = rate(b, *sum);
                    WindowCell {
                        borough: *b,
                        total_complaints: *sum,
                        population: populations.get(b).copied().unwrap_or_default(),
                        rate_per_10k,
                        color: domain.map_or(Rgb::NO_DATA, |d| shade(rate_per_10k, d, target)),
                    }
                })
                .collect();
            WindowMap {
                window: *w,
                label: w.label(),
                cells,
            }
        })
        .collect();

    CovidMaps { domain, windows }
}

/// Most frequent complaint types per window, with display names.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn covid_word_clouds(rows: &[TypeCountRow]) -> BTreeMap<CovidWindow, Vec<WordWeight>> {
    CovidWindow::ALL
        .iter()
        .map(|w| {
            let pairs = rows
                .iter()
                .filter(|r| w.contains(r.month_year))
                .map(|r| (r.complaint_type.clone(), r.complaint_count));
            let words = top_n(pairs, WORD_CLOUD_TOP_N)
                .into_iter()
                .map(|e| WordWeight {
                    name: title_case(&translate_complaint_type(&e.category)),
                    value: e.count,
                })
                .collect();
            (*w, words)
        })
        .collect()
}

/// Citywide monthly rate, split into one series per window.
///
/// Each row contributes its own implied population, so the city rate is
/// `sum(total) * 10000 / sum(population)` over the boroughs of that month.
/// Boundary months belong to both adjacent series.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn covid_city_series(rows: &[BoroughMonthRow]) -> Vec<CityRatePoint> {
    let mut months: BTreeMap<YearMonth, (u64, f64)> = BTreeMap::new();
    for r in rows {
        let entry = months.entry(r.year_month).or_default();
        entry.0.accumulate(r.total_complaints);
        entry.1 += r.implied_population().unwrap_or_default();
    }

    months
        .into_iter()
        .filter_map(|(ym, (total, population))| {
            let rate = per_capita(total as f64, population);
            let pick = |w: CovidWindow| w.contains_joined(ym).then_some(rate);
            let point = CityRatePoint {
                year_month: ym,
                pre: pick(CovidWindow::Pre),
                covid: pick(CovidWindow::Covid),
                post: pick(CovidWindow::Post),
            };
            (point.pre.is_some() || point.covid.is_some() || point.post.is_some()).then_some(point)
        })
        .collect()
}

/// All three COVID views at once.
pub fn covid_section(series: &[BoroughMonthRow], types: &[TypeCountRow]) -> CovidSection {
    if series.is_empty() {
        warn!("No time-series rows, COVID maps and rate series will be empty");
    }
    let section = CovidSection {
        maps: covid_maps(series),
        word_clouds: covid_word_clouds(types),
        city_series: covid_city_series(series),
    };
    info!(
        city_points = section.city_series.len(),
        "COVID section computed"
    );
    section
}
