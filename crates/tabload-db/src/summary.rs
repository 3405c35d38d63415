use tabload_model::TableSummary;

use crate::destination::Destination;
use crate::error::Result;

/// Row and column counts for every user table in `dest`, sorted by name.
///
/// Covers tables from earlier runs too, not only those written now.
pub fn summarize_tables<D>(dest: &D) -> Result<Vec<TableSummary>>
where
    D: Destination + ?Sized,
{
    dest.list_tables()?
        .iter()
        .map(|table| dest.table_summary(table))
        .collect()
}
