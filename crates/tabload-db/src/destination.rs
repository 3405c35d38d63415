use tabload_model::{TableSpec, TableSummary};

use crate::batch::RowBatch;
use crate::error::Result;

/// A relational database that receives imported tables.
///
/// Table (re)creation takes effect immediately. Row inserts happen between
/// [`begin`](Destination::begin) and [`commit`](Destination::commit) or
/// [`rollback`](Destination::rollback), one transaction per source file.
pub trait Destination {
    /// Name shown in logs and reports.
    fn name(&self) -> String;

    /// Drops any table named `spec.name` and creates it afresh.
    fn recreate_table(&mut self, spec: &TableSpec) -> Result<()>;

    fn begin(&mut self) -> Result<()>;

    /// Inserts every row of `batch` into `spec.name`.
    fn insert_batch(&mut self, spec: &TableSpec, batch: &RowBatch) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    /// User tables, sorted by name.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Row count and data-column count (surrogate key excluded) of `table`.
    fn table_summary(&self, table: &str) -> Result<TableSummary>;
}
