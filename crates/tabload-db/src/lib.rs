//! Destination database access for tabload.
//!
//! The loader talks to the database only through the [`Destination`] trait:
//! recreate a table, insert prepared [`RowBatch`]es inside one transaction,
//! then list and count tables for the final summary. [`SqliteDestination`]
//! is the concrete implementation.

mod batch;
mod destination;
mod error;
mod inserter;
mod sqlite;
mod summary;

pub use batch::{MISSING_SENTINELS, RowBatch, RowBatches, is_missing, prepare_row, prepare_value};
pub use destination::Destination;
pub use error::{DbError, Result};
pub use inserter::{InsertOptions, InsertProgress, insert_rows};
pub use sqlite::SqliteDestination;
pub use summary::summarize_tables;
