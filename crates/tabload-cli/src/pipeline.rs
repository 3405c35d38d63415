//! Folder load pipeline.
//!
//! Every source file goes through the same stages, tracked on its
//! [`FileReport`]:
//! 1. **Detect**: sniff the delimiter from the first line
//! 2. **Load**: parse headers and rows, skipping malformed rows
//! 3. **Create**: derive names and (re)create the destination table
//! 4. **Insert**: write rows in batches inside one transaction
//!
//! A failure at any stage is recorded on that file's report and the run moves
//! on to the next file. Only problems that affect the whole run (an
//! unreadable source directory, a broken catalog query) are returned as
//! errors.

use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, error, info, info_span, warn};

use tabload_db::{
    DbError, Destination, InsertOptions, InsertProgress, insert_rows, summarize_tables,
};
use tabload_ingest::{IngestError, detect_delimiter, list_source_files, read_delimited_table};
use tabload_model::{
    FailureKind, FileFailure, FileReport, FileStage, LoaderConfig, RunReport, TableSpec,
};
use tabload_schema::{SchemaError, build_table_spec};

/// Why a single file could not be imported.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Db(#[from] DbError),
}

impl FileError {
    /// Report category of this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Ingest(_) => FailureKind::FileParse,
            Self::Schema(_) | Self::Db(DbError::Schema { .. }) => FailureKind::Schema,
            Self::Db(_) => FailureKind::Insert,
        }
    }
}

/// Receives progress from the pipeline, e.g. to drive a progress bar.
///
/// All methods default to doing nothing.
pub trait ProgressSink {
    /// Row insertion for `table` is about to start.
    fn insert_started(&mut self, _table: &str, _total_rows: usize) {}

    fn batch_inserted(&mut self, _progress: InsertProgress) {}

    /// Whether this sink shows batch progress itself. When it does not, the
    /// pipeline logs each batch at info level instead.
    fn shows_batches(&self) -> bool {
        false
    }

    /// A file reached `Committed` or `Failed`.
    fn file_finished(&mut self, _report: &FileReport) {}
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Loads every source file of `config.source_dir` into `dest`.
///
/// Files are processed one at a time in file-name order. The returned report
/// lists one entry per file plus a summary of every table in the destination.
pub fn run<D>(config: &LoaderConfig, dest: &mut D, progress: &mut dyn ProgressSink) -> Result<RunReport>
where
    D: Destination + ?Sized,
{
    let run_span = info_span!("run", source = %config.source_dir.display());
    let _run_guard = run_span.enter();

    let files = list_source_files(&config.source_dir, config.extension())
        .context("list source files")?;
    info!(
        files = files.len(),
        database = %dest.name(),
        "starting import"
    );

    let mut report = RunReport::new(dest.name());
    for path in &files {
        let file_report = process_file(dest, path, config, progress);
        report.files.push(file_report);
    }

    report.tables = summarize_tables(&*dest).context("summarize destination tables")?;
    info!(
        succeeded = report.succeeded(),
        attempted = report.attempted(),
        "import finished"
    );
    Ok(report)
}

/// Imports one file, returning its report whatever the outcome.
pub fn process_file<D>(
    dest: &mut D,
    path: &Path,
    config: &LoaderConfig,
    progress: &mut dyn ProgressSink,
) -> FileReport
where
    D: Destination + ?Sized,
{
    let mut report = FileReport::new(path);
    let file_span = info_span!("file", file = %report.file_name());
    let _file_guard = file_span.enter();

    match import_file(dest, path, config, &mut report, progress) {
        Ok(()) => info!(
            table = report.table.as_deref().unwrap_or_default(),
            rows = report.rows_inserted,
            "file imported"
        ),
        Err(err) => {
            let failure = FileFailure::new(err.kind(), err.to_string());
            error!(
                stage = %report.stage,
                kind = %failure.kind,
                error = %failure.message,
                "file failed"
            );
            report.fail(failure);
        }
    }
    progress.file_finished(&report);
    report
}

fn import_file<D>(
    dest: &mut D,
    path: &Path,
    config: &LoaderConfig,
    report: &mut FileReport,
    progress: &mut dyn ProgressSink,
) -> std::result::Result<(), FileError>
where
    D: Destination + ?Sized,
{
    let delimiter = detect_delimiter(path)?;
    report.delimiter = Some(delimiter);
    report.advance(FileStage::DelimiterDetected);
    info!(delimiter = %delimiter, "delimiter detected");

    let table = read_delimited_table(path, delimiter)?;
    report.rows_read = table.row_count();
    report.rows_skipped = table.skipped_rows;
    report.columns = table.column_count();
    report.advance(FileStage::Loaded);
    info!(
        rows = report.rows_read,
        columns = report.columns,
        "file loaded"
    );
    if table.skipped_rows > 0 {
        warn!(skipped = table.skipped_rows, "malformed rows skipped");
    }

    let spec = build_table_spec(path, &table.headers, config.max_ident_len)?;
    report.table = Some(spec.name.clone());
    note_truncated_headers(&spec, report);
    dest.recreate_table(&spec)?;
    report.advance(FileStage::TableCreated);
    info!(table = %spec.name, columns = spec.columns.len(), "table created");

    report.advance(FileStage::Inserting);
    progress.insert_started(&spec.name, table.row_count());
    let options = InsertOptions {
        batch_size: config.batch_size,
        max_text_len: config.max_text_len,
    };
    let bar_shown = progress.shows_batches();
    let inserted = insert_rows(dest, &spec, &table.rows, options, |batch| {
        // tabload-db already logs each batch at debug level
        if !bar_shown {
            info!(batch = batch.batch, "inserted {}/{} rows", batch.inserted, batch.total);
        }
        progress.batch_inserted(batch);
    })?;
    report.rows_inserted = inserted;
    report.advance(FileStage::Committed);
    Ok(())
}

fn note_truncated_headers(spec: &TableSpec, report: &mut FileReport) {
    report.truncated_headers = spec.columns.truncated().count();
    if report.truncated_headers == 0 {
        return;
    }
    info!(
        count = report.truncated_headers,
        "long column names shortened; originals kept as column comments"
    );
    for column in spec.columns.truncated() {
        debug!(column = %column.sanitized, original = %column.original, "column name shortened");
    }
}
