use crate::borough::Borough;
use crate::records::BoroughMonthRow;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// In-place addition used by [`aggregate`]. Counts saturate at their
/// maximum instead of overflowing.
pub trait Accumulate {
    fn accumulate(&mut self, value: Self);
}

impl Accumulate for u64 {
    fn accumulate(&mut self, value: u64) {
        *self = self.saturating_add(value);
    }
}

impl Accumulate for f64 {
    fn accumulate(&mut self, value: f64) {
        *self += value;
    }
}

/// Groups `records` by `key_fn` and sums `value_fn` per group.
///
/// Records for which `key_fn` returns `None` are left out. Every group starts
/// from `V::default()` before its first value is added.
pub fn aggregate<R, K, V, F, G>(records: &[R], key_fn: F, value_fn: G) -> BTreeMap<K, V>
where
    K: Ord,
    V: Accumulate + Default,
    F: Fn(&R) -> Option<K>,
    G: Fn(&R) -> V,
{
    let mut groups = BTreeMap::new();
    for record in records {
        let Some(key) = key_fn(record) else {
            continue;
        };
        groups
            .entry(key)
            .or_insert_with(V::default)
            .accumulate(value_fn(record));
    }
    groups
}

pub fn sum_by_month(rows: &[BoroughMonthRow]) -> BTreeMap<String, u64> {
    aggregate(rows, |r| Some(r.year_month.month_key()), |r| r.total_complaints)
}

pub fn sum_by_year(rows: &[BoroughMonthRow]) -> BTreeMap<String, u64> {
    aggregate(rows, |r| Some(r.year_month.year_key()), |r| r.total_complaints)
}

/// Totals per canonical borough; unrecognized borough strings are dropped.
pub fn sum_by_borough(rows: &[BoroughMonthRow]) -> BTreeMap<Borough, u64> {
    aggregate(rows, BoroughMonthRow::canonical_borough, |r| r.total_complaints)
}

/// Fixed population per borough: the first row with a positive rate wins.
pub fn estimate_populations<'a, I>(rows: I) -> BTreeMap<Borough, f64>
where
    I: IntoIterator<Item = &'a BoroughMonthRow>,
{
    let mut populations = BTreeMap::new();
    for row in rows {
        let (Some(borough), Some(pop)) = (row.canonical_borough(), row.implied_population())
        else {
            continue;
        };
        if let Entry::Vacant(slot) = populations.entry(borough) {
            slot.insert(pop);
        }
    }
    populations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(borough: &str, ym: &str, total: u64, rate: f64) -> BoroughMonthRow {
        BoroughMonthRow {
            borough: borough.into(),
            year_month: ym.parse().unwrap(),
            total_complaints: total,
            complaints_per_10000: rate,
        }
    }

    fn sample() -> Vec<BoroughMonthRow> {
        vec![
            row("BROOKLYN", "2020-01", 100, 50.0),
            row("BROOKLYN", "2020-02", 200, 100.0),
            row("Bronx", "2020-01", 40, 0.0),
            row("Bronx", "2021-03", 60, 30.0),
            row("Unspecified", "2020-01", 999, 1.0),
        ]
    }

    #[test]
    fn test_sum_by_borough_drops_unmatched() {
        let sums = sum_by_borough(&sample());
        assert_eq!(sums.get(&Borough::Brooklyn), Some(&300));
        assert_eq!(sums.get(&Borough::Bronx), Some(&100));
        assert_eq!(sums.len(), 2);
    }

    #[test]
    fn test_totals_are_conserved() {
        let rows = sample();
        let grouped: u64 = sum_by_borough(&rows).values().sum();
        let matched: u64 = rows
            .iter()
            .filter(|r| r.canonical_borough().is_some())
            .map(|r| r.total_complaints)
            .sum();
        assert_eq!(grouped, matched);

        let by_month: u64 = sum_by_month(&rows).values().sum();
        let all: u64 = rows.iter().map(|r| r.total_complaints).sum();
        assert_eq!(by_month, all);
    }

    #[test]
    fn test_row_order_does_not_change_sums() {
        let rows = sample();
        let mut reversed = rows.clone();
        reversed.reverse();
        assert_eq!(sum_by_year(&rows), sum_by_year(&reversed));
        assert_eq!(sum_by_borough(&rows), sum_by_borough(&reversed));
    }

    #[test]
    fn test_sum_by_year() {
        let years = sum_by_year(&sample());
        assert_eq!(years.get("2020"), Some(&1339));
        assert_eq!(years.get("2021"), Some(&60));
    }

    #[test]
    fn test_first_positive_rate_sets_population() {
        let pops = estimate_populations(&sample());
        assert_eq!(pops.get(&Borough::Brooklyn), Some(&20_000.0));
        // The zero-rate row is skipped, the 2021 row supplies the estimate.
        assert_eq!(pops.get(&Borough::Bronx), Some(&20_000.0));
    }

    #[test]
    fn test_huge_counts_saturate() {
        let rows: Vec<BoroughMonthRow> = crate::parser::parse_str(
            "borough,year_month,total_complaints,complaints_per_10000\n\
             BRONX,2020-01,18446744073709551615,1\n\
             BRONX,2020-02,1,1\n",
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(sum_by_borough(&rows).get(&Borough::Bronx), Some(&u64::MAX));
        assert_eq!(sum_by_year(&rows).get("2020"), Some(&u64::MAX));
    }

    #[test]
    fn test_aggregate_sums_floats() {
        let rows = sample();
        let rates = aggregate(&rows, BoroughMonthRow::canonical_borough, |r| r.complaints_per_10000);
        assert_eq!(rates.get(&Borough::Brooklyn), Some(&150.0));
    }

    #[test]
    fn test_aggregate_empty() {
        let sums = aggregate(&[] as &[BoroughMonthRow], |r| Some(r.borough.clone()), |r| r.total_complaints);
        assert!(sums.is_empty());
    }
}
