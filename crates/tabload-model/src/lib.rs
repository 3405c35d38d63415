//! Shared types for loading delimited files into database tables.

pub mod config;
pub mod delimiter;
pub mod error;
pub mod report;
pub mod table;

pub use config::{DbTarget, LoaderConfig};
pub use delimiter::Delimiter;
pub use error::ConfigError;
pub use report::{
    FailureKind, FileFailure, FileReport, FileStage, RunReport, TableSummary, truncate_message,
};
pub use table::{ColumnMapping, ColumnMappings, KEY_COLUMN, TableSpec};
