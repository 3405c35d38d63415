//! Run configuration.
//!
//! A [`LoaderConfig`] is built once at startup (defaults, then an optional
//! TOML file, then command-line overrides) and passed explicitly to the
//! loader. Nothing reads global state after that point.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of rows written per insert batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default per-cell truncation limit, in characters.
pub const DEFAULT_MAX_TEXT_LEN: usize = 65_535;

/// Default table/column identifier limit, in characters.
pub const DEFAULT_MAX_IDENT_LEN: usize = 64;

/// Smallest identifier limit that still leaves room for a uniqueness suffix.
pub const MIN_IDENT_LEN: usize = 8;

/// Default source file extension.
pub const DEFAULT_EXTENSION: &str = "csv";

/// Where the destination database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbTarget {
    /// Database file path, or `:memory:`.
    pub path: PathBuf,
    /// Create the database file when it does not exist yet.
    pub create_if_missing: bool,
}

impl Default for DbTarget {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tabload.db"),
            create_if_missing: true,
        }
    }
}

impl DbTarget {
    /// A target at `path` that is created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_if_missing: true,
        }
    }

    /// An in-memory database, discarded when the connection closes.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Returns true for the in-memory pseudo path.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }

    /// Name shown in reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Options controlling a load run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory scanned (non-recursively) for source files.
    pub source_dir: PathBuf,
    /// Destination database.
    pub db_target: DbTarget,
    /// Rows per insert batch.
    pub batch_size: usize,
    /// Stored values longer than this many characters are cut.
    pub max_text_len: usize,
    /// Table and column names are at most this many characters.
    pub max_ident_len: usize,
    /// File extension (without the dot) selecting source files.
    pub extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            db_target: DbTarget::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            max_ident_len: DEFAULT_MAX_IDENT_LEN,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Creates a configuration for `source_dir` and `db_target` with default limits.
    pub fn new(source_dir: impl Into<PathBuf>, db_target: DbTarget) -> Self {
        Self {
            source_dir: source_dir.into(),
            db_target,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = max_text_len;
        self
    }

    #[must_use]
    pub fn with_max_ident_len(mut self, max_ident_len: usize) -> Self {
        self.max_ident_len = max_ident_len;
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Checks that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.max_text_len == 0 {
            return Err(ConfigError::ZeroTextLength);
        }
        if self.max_ident_len < MIN_IDENT_LEN {
            return Err(ConfigError::IdentifierTooShort {
                value: self.max_ident_len,
                min: MIN_IDENT_LEN,
            });
        }
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        Ok(())
    }

    /// The extension without a leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_limits() {
        let config = LoaderConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_text_len, 65_535);
        assert_eq!(config.max_ident_len, 64);
        assert_eq!(config.extension(), "csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_batch_size() {
        let config = LoaderConfig::default().with_batch_size(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroBatchSize)));
    }

    #[test]
    fn rejects_tiny_identifier_limit() {
        let config = LoaderConfig::default().with_max_ident_len(4);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IdentifierTooShort { value: 4, .. })
        ));
    }

    #[test]
    fn extension_ignores_leading_dot() {
        let config = LoaderConfig::default().with_extension(".TSV");
        assert_eq!(config.extension(), "TSV");
        assert!(config.validate().is_ok());
        let config = LoaderConfig::default().with_extension(".");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyExtension)));
    }

    #[test]
    fn in_memory_target() {
        assert!(DbTarget::in_memory().is_in_memory());
        assert!(!DbTarget::new("data.db").is_in_memory());
    }
}
