//! Delimited file loading.

use std::path::Path;

use csv::ReaderBuilder;
use tabload_model::Delimiter;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::text::decode_text;

/// A delimited file held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimitedTable {
    /// Header row, in file order.
    pub headers: Vec<String>,
    /// Data rows; every row has exactly `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
    /// Rows dropped because their field count did not match the header.
    pub skipped_rows: usize,
}

impl DelimitedTable {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Reads `path` as a table separated by `delimiter`.
///
/// The first record is the header. Rows whose field count differs from the
/// header are skipped and counted rather than failing the file.
pub fn read_delimited_table(path: &Path, delimiter: Delimiter) -> Result<DelimitedTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::from_io(path, e))?;
    let decoded = decode_text(&bytes);
    if decoded.had_errors || decoded.encoding != encoding_rs::UTF_8 {
        warn!(
            path = %path.display(),
            encoding = decoded.encoding.name(),
            lossy = decoded.had_errors,
            "file is not clean UTF-8"
        );
    }
    let table = parse_delimited(&decoded.text, delimiter, path)?;
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        skipped = table.skipped_rows,
        "loaded delimited file"
    );
    Ok(table)
}

/// Parses already-decoded text. `path` is only used in error messages.
pub fn parse_delimited(text: &str, delimiter: Delimiter, path: &Path) -> Result<DelimitedTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    let mut skipped_rows = 0usize;
    for record in reader.records() {
        match record {
            Ok(record) if record.len() == headers.len() => {
                rows.push(record.iter().map(str::to_string).collect());
            }
            Ok(record) => {
                skipped_rows += 1;
                debug!(
                    path = %path.display(),
                    line = record.position().map(csv::Position::line),
                    fields = record.len(),
                    expected = headers.len(),
                    "skipping row with wrong field count"
                );
            }
            Err(error) => {
                skipped_rows += 1;
                debug!(path = %path.display(), %error, "skipping unparseable row");
            }
        }
    }

    Ok(DelimitedTable {
        headers,
        rows,
        skipped_rows,
    })
}
