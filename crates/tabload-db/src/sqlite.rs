//! SQLite destination.

use rusqlite::{Connection, OpenFlags, OptionalExtension, params_from_iter};
use tabload_model::{DbTarget, KEY_COLUMN, TableSpec, TableSummary};
use tabload_schema::{create_table_sql, drop_table_sql, insert_sql, quote_identifier};
use tracing::{debug, info};

use crate::batch::RowBatch;
use crate::destination::Destination;
use crate::error::{DbError, Result};

/// A SQLite database file (or in-memory database) receiving imported tables.
///
/// The connection is closed when the value is dropped.
#[derive(Debug)]
pub struct SqliteDestination {
    conn: Connection,
    target: DbTarget,
}

impl SqliteDestination {
    /// Opens the database described by `target`.
    ///
    /// Fails with [`DbError::Connection`] when the file is missing (and
    /// `create_if_missing` is off), unreadable, or not a SQLite database.
    pub fn open(target: &DbTarget) -> Result<Self> {
        let connection_error = |source| DbError::Connection {
            target: target.display_name(),
            source,
        };
        let conn = if target.is_in_memory() {
            Connection::open_in_memory().map_err(connection_error)?
        } else {
            let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX;
            if target.create_if_missing {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
            Connection::open_with_flags(&target.path, flags).map_err(connection_error)?
        };
        // Opening is lazy; touching the schema proves the file is a database.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_error)?;
        info!(database = %target.display_name(), "connected to destination database");
        Ok(Self {
            conn,
            target: target.clone(),
        })
    }

    /// An empty in-memory database.
    pub fn in_memory() -> Result<Self> {
        Self::open(&DbTarget::in_memory())
    }

    /// Stored `CREATE TABLE` text of `table`, including its annotations.
    pub fn table_definition(&self, table: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| DbError::Query { source })
    }

    /// Closes the connection, reporting any error instead of ignoring it.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, source)| DbError::Connection {
                target: self.target.display_name(),
                source,
            })
    }

    fn transaction(&self, action: &'static str, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|source| DbError::Transaction { action, source })
    }
}

impl Destination for SqliteDestination {
    fn name(&self) -> String {
        self.target.display_name()
    }

    fn recreate_table(&mut self, spec: &TableSpec) -> Result<()> {
        let schema_error = |source| DbError::Schema {
            table: spec.name.clone(),
            source,
        };
        self.conn
            .execute(&drop_table_sql(&spec.name), [])
            .map_err(schema_error)?;
        self.conn
            .execute(&create_table_sql(spec), [])
            .map_err(schema_error)?;
        debug!(table = %spec.name, columns = spec.columns.len(), "table recreated");
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.transaction("begin", "BEGIN")
    }

    fn insert_batch(&mut self, spec: &TableSpec, batch: &RowBatch) -> Result<()> {
        let insert_error = |source| DbError::Insert {
            table: spec.name.clone(),
            batch: batch.number,
            source,
        };
        let mut statement = self
            .conn
            .prepare_cached(&insert_sql(spec))
            .map_err(insert_error)?;
        for row in &batch.rows {
            statement
                .execute(params_from_iter(row.iter()))
                .map_err(insert_error)?;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.transaction("commit", "COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.transaction("rollback", "ROLLBACK")
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        let query_error = |source| DbError::Query { source };
        let mut statement = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
                 ORDER BY name",
            )
            .map_err(query_error)?;
        let names = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(query_error)?;
        Ok(names)
    }

    fn table_summary(&self, table: &str) -> Result<TableSummary> {
        let query_error = |source| DbError::Query { source };
        let rows: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
                [],
                |row| row.get(0),
            )
            .map_err(query_error)?;
        let columns: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name <> ?2",
                [table, KEY_COLUMN],
                |row| row.get(0),
            )
            .map_err(query_error)?;
        Ok(TableSummary {
            name: table.to_string(),
            rows: u64::try_from(rows).unwrap_or_default(),
            columns: usize::try_from(columns).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabload_model::{ColumnMapping, ColumnMappings};

    fn spec(name: &str, columns: &[&str]) -> TableSpec {
        TableSpec {
            name: name.to_string(),
            source_file: format!("{name}.csv"),
            columns: ColumnMappings::new(
                columns
                    .iter()
                    .enumerate()
                    .map(|(index, column)| ColumnMapping {
                        index,
                        original: (*column).to_string(),
                        sanitized: (*column).to_string(),
                    })
                    .collect(),
            ),
        }
    }

    fn batch(rows: &[&[Option<&str>]]) -> RowBatch {
        RowBatch {
            number: 1,
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| v.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn recreate_insert_and_summarize() {
        let mut db = SqliteDestination::in_memory().unwrap();
        let spec = spec("people", &["name", "city"]);
        db.recreate_table(&spec).unwrap();
        db.begin().unwrap();
        db.insert_batch(&spec, &batch(&[&[Some("ann"), None], &[Some("bob"), Some("x")]]))
            .unwrap();
        db.commit().unwrap();

        let summary = db.table_summary("people").unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.columns, 2);
        assert_eq!(db.list_tables().unwrap(), vec!["people"]);

        let nulls: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM people WHERE city IS NULL", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn rollback_discards_uncommitted_rows() {
        let mut db = SqliteDestination::in_memory().unwrap();
        let spec = spec("t", &["a"]);
        db.recreate_table(&spec).unwrap();
        db.begin().unwrap();
        db.insert_batch(&spec, &batch(&[&[Some("1")]])).unwrap();
        db.rollback().unwrap();

        assert_eq!(db.table_summary("t").unwrap().rows, 0);
        // Nothing left to roll back.
        db.rollback().unwrap();
    }

    #[test]
    fn internal_tables_are_not_listed() {
        let mut db = SqliteDestination::in_memory().unwrap();
        db.recreate_table(&spec("b_table", &["x"])).unwrap();
        db.recreate_table(&spec("a_table", &["x"])).unwrap();
        // AUTOINCREMENT creates sqlite_sequence on first insert
        db.begin().unwrap();
        db.insert_batch(&spec("a_table", &["x"]), &batch(&[&[Some("1")]]))
            .unwrap();
        db.commit().unwrap();

        assert_eq!(db.list_tables().unwrap(), vec!["a_table", "b_table"]);
    }

    #[test]
    fn definition_keeps_source_annotation() {
        let mut db = SqliteDestination::in_memory().unwrap();
        db.recreate_table(&spec("orders", &["total"])).unwrap();
        let sql = db.table_definition("orders").unwrap().unwrap();
        assert!(sql.contains("-- Imported from orders.csv"));
        assert_eq!(db.table_definition("missing").unwrap(), None);
    }

    #[test]
    fn reserved_table_name_is_a_schema_error() {
        let mut db = SqliteDestination::in_memory().unwrap();
        let result = db.recreate_table(&spec("sqlite_data", &["x"]));
        assert!(matches!(result, Err(DbError::Schema { .. })));
    }
}
