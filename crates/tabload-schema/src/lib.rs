//! Naming and DDL for tabload destination tables.
//!
//! Source headers and file names are arbitrary text; database identifiers
//! are not. This crate turns the former into the latter
//! ([`sanitize_identifier`], [`build_column_mappings`]), bundles the result
//! into a [`TableSpec`] and renders the SQL that creates and fills it.

mod ddl;
mod error;
mod mapping;
mod sanitize;

use std::path::Path;

use tabload_model::TableSpec;

pub use ddl::{create_table_sql, drop_table_sql, insert_sql, quote_identifier};
pub use error::{Result, SchemaError};
pub use mapping::{UNIQUENESS_HEADROOM, build_column_mappings};
pub use sanitize::sanitize_identifier;

/// Derives the destination table for the file at `path` with the given headers.
///
/// The table name is the sanitized file stem; columns come from
/// [`build_column_mappings`].
pub fn build_table_spec(path: &Path, headers: &[String], max_ident_len: usize) -> Result<TableSpec> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let name = sanitize_identifier(&stem, max_ident_len);
    if name.is_empty() {
        return Err(SchemaError::EmptyTableName {
            path: path.to_path_buf(),
        });
    }
    if headers.is_empty() {
        return Err(SchemaError::NoColumns {
            path: path.to_path_buf(),
        });
    }
    let source_file = path
        .file_name()
        .map(|file| file.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(TableSpec {
        name,
        source_file,
        columns: build_column_mappings(headers, max_ident_len),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_comes_from_file_stem() {
        let headers = vec!["A".to_string()];
        let spec = build_table_spec(Path::new("dir/Sales Q1-2024.csv"), &headers, 64).unwrap();
        assert_eq!(spec.name, "sales_q1_2024");
        assert_eq!(spec.source_file, "Sales Q1-2024.csv");
    }

    #[test]
    fn unusable_file_name_is_rejected() {
        let headers = vec!["A".to_string()];
        let result = build_table_spec(Path::new("dir/###.csv"), &headers, 64);
        assert!(matches!(result, Err(SchemaError::EmptyTableName { .. })));
    }

    #[test]
    fn no_headers_is_rejected() {
        let result = build_table_spec(Path::new("dir/a.csv"), &[], 64);
        assert!(matches!(result, Err(SchemaError::NoColumns { .. })));
    }
}
