//! Destination table descriptions derived from a source file.

use serde::{Deserialize, Serialize};

/// Name of the generated surrogate key column.
pub const KEY_COLUMN: &str = "id";

/// Original headers longer than this are annotated on their column.
pub const COMMENT_THRESHOLD: usize = 64;

/// Column annotations keep at most this many characters of the original header.
pub const MAX_COMMENT_LEN: usize = 250;

/// One source header and the identifier it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Position of the header in the source file.
    pub index: usize,
    /// Header text as read from the file.
    pub original: String,
    /// Sanitized, table-unique column identifier.
    pub sanitized: String,
}

impl ColumnMapping {
    /// Returns true when the original header exceeds the identifier limit.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.original.chars().count() > COMMENT_THRESHOLD
    }

    /// Column annotation preserving the original header, if it was too long.
    #[must_use]
    pub fn comment(&self) -> Option<String> {
        if self.is_truncated() {
            Some(self.original.chars().take(MAX_COMMENT_LEN).collect())
        } else {
            None
        }
    }
}

/// Ordered header-to-column mapping for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMappings {
    columns: Vec<ColumnMapping>,
}

impl ColumnMappings {
    #[must_use]
    pub fn new(columns: Vec<ColumnMapping>) -> Self {
        Self { columns }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnMapping> {
        self.columns.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Sanitized identifiers in source order.
    pub fn sanitized_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.sanitized.as_str())
    }

    /// Headers whose original text was longer than the identifier limit.
    pub fn truncated(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.columns.iter().filter(|column| column.is_truncated())
    }
}

impl<'a> IntoIterator for &'a ColumnMappings {
    type Item = &'a ColumnMapping;
    type IntoIter = std::slice::Iter<'a, ColumnMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Everything needed to (re)create and fill one destination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Sanitized table name.
    pub name: String,
    /// File name the table was imported from.
    pub source_file: String,
    /// Data columns, excluding the surrogate key.
    pub columns: ColumnMappings,
}

impl TableSpec {
    /// Surrogate key column name.
    #[must_use]
    pub fn key_column(&self) -> &'static str {
        KEY_COLUMN
    }

    /// Table annotation recording the source file.
    #[must_use]
    pub fn comment(&self) -> String {
        format!("Imported from {}", self.source_file)
    }
}
