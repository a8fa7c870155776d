//! Calendar period keys: `YYYY-MM` months, years, and the fixed COVID windows.

use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            year: date.year(),
            month: date.month(),
        })
    }

    /// The `YYYY-MM` grouping key.
    pub fn month_key(&self) -> String {
        self.to_string()
    }

    /// The `YYYY` grouping key.
    pub fn year_key(&self) -> String {
        year_key(&self.month_key()).to_string()
    }
}

/// First four characters of a month key.
pub fn year_key(month_key: &str) -> &str {
    month_key.get(..4).unwrap_or(month_key)
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_matches('"');
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| anyhow!("expected YYYY-MM, got {s:?}"))?;
        let year: i32 = y.parse()?;
        // Tolerate a trailing day component ("2020-01-01"), nothing more.
        let (month, day) = match m.split_once('-') {
            Some((m, d)) => (m.parse::<u32>()?, d.parse::<u32>()?),
            None => (m.parse::<u32>()?, 1),
        };
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| YearMonth::new(date.year(), date.month()))
            .ok_or_else(|| anyhow!("invalid month in {s:?}"))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The three windows compared in the COVID impact section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CovidWindow {
    Pre,
    Covid,
    Post,
}

impl CovidWindow {
    pub const ALL: [CovidWindow; 3] = [CovidWindow::Pre, CovidWindow::Covid, CovidWindow::Post];

    /// Inclusive first and last month of the window.
    pub fn range(&self) -> (YearMonth, YearMonth) {
        let (a, b) = match self {
            CovidWindow::Pre => ((2019, 1), (2020, 2)),
            CovidWindow::Covid => ((2020, 3), (2021, 6)),
            CovidWindow::Post => ((2021, 7), (2022, 12)),
        };
        (
            YearMonth { year: a.0, month: a.1 },
            YearMonth { year: b.0, month: b.1 },
        )
    }

    pub fn contains(&self, ym: YearMonth) -> bool {
        let (start, end) = self.range();
        start <= ym && ym <= end
    }

    /// Window holding `ym`, if any.
    pub fn of(ym: YearMonth) -> Option<CovidWindow> {
        CovidWindow::ALL.into_iter().find(|w| w.contains(ym))
    }

    /// Like [`contains`](Self::contains) but the upper bound extends to the
    /// first month of the following window, so adjacent line series share
    /// their boundary point.
    pub fn contains_joined(&self, ym: YearMonth) -> bool {
        let (start, end) = self.range();
        let upper = match self {
            CovidWindow::Pre => CovidWindow::Covid.range().0,
            CovidWindow::Covid => CovidWindow::Post.range().0,
            CovidWindow::Post => end,
        };
        start <= ym && ym <= upper
    }

    pub fn color(&self) -> &'static str {
        match self {
            CovidWindow::Pre => "#4C78A8",
            CovidWindow::Covid => "#F58518",
            CovidWindow::Post => "#54A24B",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CovidWindow::Pre => "Pre-COVID (2019-01 a 2020-02)",
            CovidWindow::Covid => "Durante COVID (2020-03 a 2021-06)",
            CovidWindow::Post => "Post-COVID (2021-07 a 2022-12)",
        }
    }
}
