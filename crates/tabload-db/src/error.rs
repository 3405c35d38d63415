//! Error types for destination database access.

use thiserror::Error;

/// Errors raised by a [`Destination`](crate::Destination).
#[derive(Debug, Error)]
pub enum DbError {
    /// The destination database cannot be opened or is not a database.
    ///
    /// Fatal for the whole run.
    #[error("cannot open database {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Dropping or creating a table failed.
    #[error("cannot create table {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A row in an insert batch was rejected.
    #[error("insert into {table} failed in batch {batch}: {source}")]
    Insert {
        table: String,
        batch: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// Beginning, committing or rolling back a transaction failed.
    #[error("transaction {action} failed: {source}")]
    Transaction {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A catalog or count query failed.
    #[error("query failed: {source}")]
    Query {
        #[source]
        source: rusqlite::Error,
    },
}

pub type Result<T> = std::result::Result<T, DbError>;
