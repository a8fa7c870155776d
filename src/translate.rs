//! English → Spanish display labels for agencies and complaint types.
//!
//! Both lookup tables ship inside the binary and are parsed once, on first
//! use. A label without a mapping is returned unchanged.

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, error};

const AGENCY_CSV: &str = include_str!("../data/agency_translation.csv");
const COMPLAINT_TYPE_CSV: &str = include_str!("../data/complaint_type_translation.csv");

lazy_static! {
    static ref AGENCIES: Translator =
        Translator::embedded(AGENCY_CSV, "agency_name", "agency_name_es");
    static ref COMPLAINT_TYPES: Translator =
        Translator::embedded(COMPLAINT_TYPE_CSV, "complaint_type", "complaint_type_es");
}

/// Read-only label lookup built from a two-column CSV.
#[derive(Debug, Default)]
pub struct Translator {
    entries: HashMap<String, String>,
}

impl Translator {
    /// Builds a lookup from the `from` and `to` columns of a CSV with headers.
    /// Rows where either side is empty are ignored.
    pub fn from_reader<R: Read>(reader: R, from: &str, to: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let position = |col: &str| {
            headers
                .iter()
                .position(|h| h == col)
                .ok_or_else(|| anyhow!("translation table has no {col:?} column"))
        };
        let (from_idx, to_idx) = (position(from)?, position(to)?);

        let mut entries = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            match (record.get(from_idx), record.get(to_idx)) {
                (Some(k), Some(v)) if !k.is_empty() && !v.is_empty() => {
                    entries.insert(k.to_string(), v.to_string());
                }
                _ => {}
            }
        }

        Ok(Self { entries })
    }

    fn embedded(text: &str, from: &str, to: &str) -> Self {
        match Self::from_reader(text.as_bytes(), from, to) {
            Ok(t) => {
                debug!(table = from, entries = t.len(), "Translation table loaded");
                t
            }
            Err(e) => {
                error!(table = from, error = %e, "Failed to load translation table");
                Self::default()
            }
        }
    }

    pub fn translate<'a>(&'a self, label: &'a str) -> &'a str {
        self.entries.get(label).map(String::as_str).unwrap_or(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn translate_agency_name(name: &str) -> String {
    AGENCIES.translate(name).to_string()
}

pub fn translate_complaint_type(name: &str) -> String {
    COMPLAINT_TYPES.translate(name).to_string()
}

/// Lowercases everything, then capitalizes the first letter of each word.
pub fn title_case(s: &str) -> String {
    s.to_lowercase()
        .split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Axis label for the bump chart: hyphens dropped, Title Case, at most two
/// lines split where the character count is roughly balanced.
pub fn wrap_label(label: &str) -> String {
    let mut stripped = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            while chars.next_if(|n| n.is_whitespace()).is_some() {}
        } else {
            stripped.push(c);
        }
    }

    let titled = title_case(&stripped);
    let words: Vec<&str> = titled.split_whitespace().collect();
    if words.len() <= 2 {
        return words.join("\n");
    }

    let total: usize = words.iter().map(|w| w.chars().count()).sum();
    let target = total as f64 / 2.0;

    let mut acc = 0usize;
    let mut split = words.len();
    for (i, w) in words.iter().enumerate() {
        acc += w.chars().count();
        if acc as f64 >= target {
            split = i + 1;
            break;
        }
    }

    let line1 = words[..split].join(" ");
    let line2 = words[split..].join(" ");
    format!("{line1}\n{line2}").trim().to_string()
}

/// Greedy word wrap: each line takes words while it stays within `width`
/// characters. A single longer word gets a line of its own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 1 + word.chars().count() <= width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }
    lines
}
