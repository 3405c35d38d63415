//! Transactional batch insertion of one file's rows.

use tabload_model::TableSpec;
use tracing::{debug, warn};

use crate::batch::RowBatches;
use crate::destination::Destination;
use crate::error::Result;

/// Batching parameters for [`insert_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOptions {
    pub batch_size: usize,
    pub max_text_len: usize,
}

/// Progress after a batch has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertProgress {
    pub batch: usize,
    pub inserted: usize,
    pub total: usize,
}

/// Inserts `rows` into `spec.name` inside a single transaction.
///
/// Rows are sent in batches of `options.batch_size` (at least one row), and
/// `on_batch` is called after each one. Any failure rolls the transaction
/// back so the table keeps none of this file's rows, and the error is
/// returned.
pub fn insert_rows<D, F>(
    dest: &mut D,
    spec: &TableSpec,
    rows: &[Vec<String>],
    options: InsertOptions,
    mut on_batch: F,
) -> Result<usize>
where
    D: Destination + ?Sized,
    F: FnMut(InsertProgress),
{
    dest.begin()?;
    match send_batches(dest, spec, rows, options, &mut on_batch) {
        Ok(inserted) => Ok(inserted),
        Err(error) => {
            if let Err(rollback_error) = dest.rollback() {
                warn!(table = %spec.name, error = %rollback_error, "rollback failed");
            }
            Err(error)
        }
    }
}

fn send_batches<D, F>(
    dest: &mut D,
    spec: &TableSpec,
    rows: &[Vec<String>],
    options: InsertOptions,
    on_batch: &mut F,
) -> Result<usize>
where
    D: Destination + ?Sized,
    F: FnMut(InsertProgress),
{
    let mut inserted = 0;
    for batch in RowBatches::new(rows, options.batch_size, options.max_text_len) {
        dest.insert_batch(spec, &batch)?;
        inserted += batch.len();
        debug!(table = %spec.name, batch = batch.number, inserted, "batch inserted");
        on_batch(InsertProgress {
            batch: batch.number,
            inserted,
            total: rows.len(),
        });
    }
    dest.commit()?;
    Ok(inserted)
}
