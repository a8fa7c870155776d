//! Reading data files from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::parser::parse_rows;
use crate::records::Schema;
use anyhow::Result;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, error};

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url).await?;
    Ok(resp.bytes().await?.to_vec())
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Joins a file name onto a data directory or base URL.
pub fn join_source(base: &str, file: &str) -> String {
    if base.is_empty() {
        return file.to_string();
    }
    if is_remote(base) {
        format!("{}/{}", base.trim_end_matches('/'), file)
    } else {
        std::path::Path::new(base)
            .join(file)
            .to_string_lossy()
            .into_owned()
    }
}

/// Reads a local path or URL. Sources ending in `.gz` are decompressed.
#[tracing::instrument(skip(client))]
pub async fn read_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source).await?
    } else {
        tokio::fs::read(source).await?
    };

    if source.ends_with(".gz") {
        let mut out = Vec::new();
        GzDecoder::new(bytes.as_slice()).read_to_end(&mut out)?;
        debug!(compressed = bytes.len(), size = out.len(), "Decompressed source");
        return Ok(out);
    }

    debug!(size = bytes.len(), "Source read");
    Ok(bytes)
}

/// Loads and parses `source`, logging and swallowing any read failure.
///
/// A missing file or failed fetch leaves the caller with an empty dataset.
/// Nothing is retried.
pub async fn load_or_empty<R: Schema, C: HttpClient>(client: &C, source: &str) -> Vec<R> {
    match read_source(client, source).await {
        Ok(bytes) => parse_rows(bytes.as_slice()),
        Err(e) => {
            error!(source, kind = R::KIND, error = %e, "Failed to load data file");
            Vec::new()
        }
    }
}
