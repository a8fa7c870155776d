//! Output formatting and persistence for chart documents.
//!
//! Supports pretty-printing, JSON to stdout or a file, and flat CSV tables.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a document to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Writes a document to `path` as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    info!(path, "JSON written");
    Ok(())
}

/// Writes `rows` to `path` as CSV with a header row, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path, rows = rows.len(), "CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[derive(Debug, Serialize)]
    struct Row {
        borough: &'static str,
        total: u64,
        population: Option<f64>,
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { borough: "Bronx", total: 3, population: Some(10.0) },
            Row { borough: "Queens", total: 4, population: None },
        ]
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&rows());
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = temp_path("nyc311_stats_test_json");
        let path = format!("{dir}/nested/out.json");
        let _ = fs::remove_dir_all(&dir);

        write_json(&path, &serde_json::json!({ "total": 7 })).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["total"], 7);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let path = temp_path("nyc311_stats_test_rows.csv");
        let _ = fs::remove_file(&path);

        write_csv(&path, &rows()).unwrap();
        // A second write replaces rather than appends.
        write_csv(&path, &rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "borough,total,population");
        assert_eq!(lines[2], "Queens,4,");

        fs::remove_file(&path).unwrap();
    }
}
