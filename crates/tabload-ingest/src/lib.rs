//! Source file ingestion for tabload.
//!
//! This crate finds delimited text files in a folder, guesses each file's
//! field separator and parses it into an in-memory [`DelimitedTable`].
//!
//! # Features
//!
//! - **Discovery**: non-recursive, extension-filtered, sorted by file name
//! - **Delimiter detection**: best of comma, semicolon, tab and pipe on the first line
//! - **Decoding**: BOM-aware, with a Windows-1252 fallback for non-UTF-8 exports
//! - **Loading**: malformed rows are skipped and counted, never fatal
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabload_ingest::{detect_delimiter, list_source_files, read_delimited_table};
//!
//! for path in list_source_files(Path::new("batches"), "csv")? {
//!     let delimiter = detect_delimiter(&path)?;
//!     let table = read_delimited_table(&path, delimiter)?;
//!     println!("{}: {} rows", path.display(), table.row_count());
//! }
//! ```

mod delimiter;
mod discovery;
mod error;
mod table;
mod text;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::list_source_files;

// === Delimiter Detection ===
pub use delimiter::{detect_delimiter, detect_delimiter_in_line};

// === Loading ===
pub use table::{DelimitedTable, parse_delimited, read_delimited_table};
pub use text::{DecodedText, decode_text};
