//! CSV loader: delimited text with a header row into typed records.
//!
//! Rows that fail to deserialize (a required numeric field that is empty,
//! non-numeric or negative, an unparseable month) are skipped and counted,
//! never coerced to zero. Input whose header lacks a required column yields
//! no records.

use crate::records::Schema;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use tracing::{debug, warn};

/// Parses every well-formed row of `reader` into `R`.
pub fn parse_rows<R: Schema, T: Read>(reader: T) -> Vec<R> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = match rdr.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            warn!(kind = R::KIND, error = %e, "Unreadable CSV header");
            return Vec::new();
        }
    };

    if !R::accepts_headers(&headers) {
        warn!(
            kind = R::KIND,
            required = ?R::REQUIRED,
            found = ?headers.iter().collect::<Vec<_>>(),
            "CSV header missing required columns"
        );
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(kind = R::KIND, line = line + 2, error = %e, "Unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        // Blank lines come through as a single empty field.
        if record.iter().all(str::is_empty) {
            continue;
        }

        match record.deserialize::<R>(Some(&headers)) {
            Ok(row) if row.is_valid() => rows.push(row),
            Ok(_) => {
                debug!(kind = R::KIND, line = line + 2, "Row failed validation");
                skipped += 1;
            }
            Err(e) => {
                debug!(kind = R::KIND, line = line + 2, error = %e, "Row failed to parse");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(kind = R::KIND, skipped, kept = rows.len(), "Skipped malformed CSV rows");
    }
    debug!(kind = R::KIND, rows = rows.len(), "CSV parsed");

    rows
}

/// Convenience wrapper over [`parse_rows`] for in-memory text.
pub fn parse_str<R: Schema>(text: &str) -> Vec<R> {
    parse_rows(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AgencyMonthRow, BoroughMonthRow, ComplaintTypeRow};

    const SERIES: &str = "borough,year_month,total_complaints,complaints_per_10000
BROOKLYN,2020-01,100,50
BROOKLYN,2020-02,200,100
";

    #[test]
    fn test_parse_time_series() {
        let rows: Vec<BoroughMonthRow> = parse_str(SERIES);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].borough, "BROOKLYN");
        assert_eq!(rows[0].year_month.to_string(), "2020-01");
        assert_eq!(rows[1].total_complaints, 200);
        assert_eq!(rows[1].complaints_per_10000, 100.0);
    }

    #[test]
    fn test_malformed_numeric_rows_are_skipped() {
        let text = "borough,year_month,total_complaints,complaints_per_10000
BRONX,2020-01,abc,10
BRONX,2020-02,,10
BRONX,2020-03,-5,10
BRONX,2020-04,7,oops
BRONX,2020-05,9,3.5
";
        let rows: Vec<BoroughMonthRow> = parse_str(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_complaints, 9);
    }

    #[test]
    fn test_bad_month_is_skipped() {
        let text = "borough,year_month,total_complaints,complaints_per_10000
QUEENS,2020-13,1,1
QUEENS,not-a-month,1,1
QUEENS,2020-12,1,1
";
        let rows: Vec<BoroughMonthRow> = parse_str(text);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_headerless_input_is_empty() {
        let rows: Vec<BoroughMonthRow> = parse_str("BROOKLYN,2020-01,100,50\n");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_and_garbage_input_is_empty() {
        assert!(parse_str::<BoroughMonthRow>("").is_empty());
        assert!(parse_str::<AgencyMonthRow>("\u{0}\u{1}garbage").is_empty());
    }

    #[test]
    fn test_blank_lines_and_whitespace_tolerated() {
        let text = "month_year , agency , agency_name , complaint_count

2020-01, NYPD , New York City Police Department , 42

";
        let rows: Vec<AgencyMonthRow> = parse_str(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].agency, "NYPD");
        assert_eq!(rows[0].complaint_count, 42);
    }

    #[test]
    fn test_complaint_type_variants() {
        let general = "month_year,complaint_type,rank,cantidad_reclamos
2020-01,Noise - Residential,1,500
";
        let scoped = "borough,month_year,complaint_type,rank,complaint_count
BRONX,2020-01,HEAT/HOT WATER,,80
";
        let g: Vec<ComplaintTypeRow> = parse_str(general);
        let s: Vec<ComplaintTypeRow> = parse_str(scoped);
        assert_eq!(g[0].count(), 500);
        assert_eq!(g[0].rank, Some(1));
        assert_eq!(s[0].count(), 80);
        assert_eq!(s[0].rank, None);
        assert_eq!(s[0].borough.as_deref(), Some("BRONX"));
    }
}
