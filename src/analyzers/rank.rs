//! Top-N ranking of categories within each period.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One ranked category in a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub category: String,
    pub rank: usize,
    pub count: u64,
}

/// Per-period top-N rankings, periods in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub top_n: usize,
    pub periods: BTreeMap<String, Vec<RankedEntry>>,
}

/// A category's rank across every period; `None` where it fell outside the top N.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSeries {
    pub category: String,
    pub ranks: Vec<Option<usize>>,
}

/// Sums `(category, value)` pairs and returns the `n` largest.
///
/// The sort is stable, so on equal sums the category seen first keeps the
/// better rank.
pub fn top_n<I>(pairs: I, n: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (category, value) in pairs {
        match index.get(&category) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(value),
            None => {
                index.insert(category.clone(), order.len());
                order.push((category, value));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (category, count))| RankedEntry {
            category,
            rank: i + 1,
            count,
        })
        .collect()
}

/// Ranks categories by summed value within each period.
pub fn rank_top_n<R, P, C, V>(
    records: &[R],
    period_fn: P,
    category_fn: C,
    value_fn: V,
    n: usize,
) -> Ranking
where
    P: Fn(&R) -> Option<String>,
    C: Fn(&R) -> String,
    V: Fn(&R) -> u64,
{
    let mut by_period: BTreeMap<String, Vec<(String, u64)>> = BTreeMap::new();
    for record in records {
        let Some(period) = period_fn(record) else {
            continue;
        };
        by_period
            .entry(period)
            .or_default()
            .push((category_fn(record), value_fn(record)));
    }

    let periods = by_period
        .into_iter()
        .map(|(period, pairs)| (period, top_n(pairs, n)))
        .collect();

    Ranking { top_n: n, periods }
}

impl Ranking {
    pub fn period_keys(&self) -> Vec<String> {
        self.periods.keys().cloned().collect()
    }

    pub fn rank(&self, period: &str, category: &str) -> Option<usize> {
        self.entry(period, category).map(|e| e.rank)
    }

    pub fn count(&self, period: &str, category: &str) -> Option<u64> {
        self.entry(period, category).map(|e| e.count)
    }

    fn entry(&self, period: &str, category: &str) -> Option<&RankedEntry> {
        self.periods
            .get(period)?
            .iter()
            .find(|e| e.category == category)
    }

    /// Categories of the first period, in rank order.
    pub fn first_labels(&self) -> Vec<String> {
        Self::labels(self.periods.values().next())
    }

    /// Categories of the last period, in rank order.
    pub fn last_labels(&self) -> Vec<String> {
        Self::labels(self.periods.values().next_back())
    }

    fn labels(entries: Option<&Vec<RankedEntry>>) -> Vec<String> {
        entries
            .map(|es| es.iter().map(|e| e.category.clone()).collect())
            .unwrap_or_default()
    }

    /// One series per category that ranked in any period, in order of first
    /// appearance.
    pub fn series(&self) -> Vec<RankSeries> {
        let mut categories: Vec<&str> = Vec::new();
        for entries in self.periods.values() {
            for e in entries {
                if !categories.contains(&e.category.as_str()) {
                    categories.push(&e.category);
                }
            }
        }

        categories
            .into_iter()
            .map(|category| RankSeries {
                category: category.to_string(),
                ranks: self
                    .periods
                    .keys()
                    .map(|p| self.rank(p, category))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, &'static str, u64);

    fn rank(rows: &[Row], n: usize) -> Ranking {
        rank_top_n(
            rows,
            |r| Some(r.0.to_string()),
            |r| r.1.to_string(),
            |r| r.2,
            n,
        )
    }

    #[test]
    fn test_ranks_are_dense_and_truncated() {
        let rows = [
            Row("2020", "a", 5),
            Row("2020", "b", 9),
            Row("2020", "c", 1),
            Row("2020", "d", 7),
            Row("2021", "a", 3),
        ];
        let ranking = rank(&rows, 3);

        let y2020 = &ranking.periods["2020"];
        assert_eq!(y2020.len(), 3);
        let ranks: Vec<usize> = y2020.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        let cats: Vec<&str> = y2020.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(cats, vec!["b", "d", "a"]);
        assert_eq!(ranking.rank("2020", "c"), None);
        assert_eq!(ranking.periods["2021"].len(), 1);
    }

    #[test]
    fn test_values_are_summed_per_category() {
        let rows = [Row("2020", "a", 5), Row("2020", "b", 6), Row("2020", "a", 2)];
        let ranking = rank(&rows, 6);
        assert_eq!(ranking.rank("2020", "a"), Some(1));
        assert_eq!(ranking.count("2020", "a"), Some(7));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let rows = [Row("2020", "x", 4), Row("2020", "y", 4), Row("2020", "z", 4)];
        let ranking = rank(&rows, 2);
        assert_eq!(ranking.rank("2020", "x"), Some(1));
        assert_eq!(ranking.rank("2020", "y"), Some(2));
        assert_eq!(ranking.rank("2020", "z"), None);
    }

    #[test]
    fn test_series_marks_exits_as_none() {
        let rows = [
            Row("2019", "a", 10),
            Row("2019", "b", 5),
            Row("2020", "b", 10),
            Row("2020", "c", 5),
        ];
        let ranking = rank(&rows, 2);
        let series = ranking.series();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].category, "a");
        assert_eq!(series[0].ranks, vec![Some(1), None]);
        assert_eq!(series[1].ranks, vec![Some(2), Some(1)]);
        assert_eq!(series[2].ranks, vec![None, Some(2)]);
        assert_eq!(ranking.first_labels(), vec!["a", "b"]);
        assert_eq!(ranking.last_labels(), vec!["b", "c"]);
    }

    #[test]
    fn test_huge_values_saturate() {
        let rows = [Row("2020", "a", u64::MAX), Row("2020", "a", 1), Row("2020", "b", 2)];
        let ranking = rank(&rows, 2);
        assert_eq!(ranking.count("2020", "a"), Some(u64::MAX));
        assert_eq!(ranking.rank("2020", "b"), Some(2));
    }

    #[test]
    fn test_periods_without_key_are_skipped() {
        let rows = [Row("", "a", 1)];
        let ranking = rank_top_n(
            &rows,
            |r| (!r.0.is_empty()).then(|| r.0.to_string()),
            |r| r.1.to_string(),
            |r| r.2,
            6,
        );
        assert!(ranking.periods.is_empty());
        assert!(ranking.series().is_empty());
    }
}
