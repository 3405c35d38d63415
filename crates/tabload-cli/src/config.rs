//! Building the run configuration from a TOML file and command-line flags.
//!
//! Precedence, lowest first: built-in defaults, the `--config` file, flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tabload_model::LoaderConfig;

/// Values given on the command line. `None` keeps the lower-precedence value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub no_create: bool,
    pub batch_size: Option<usize>,
    pub max_text_len: Option<usize>,
    pub max_ident_len: Option<usize>,
    pub extension: Option<String>,
}

/// Reads a configuration file. Missing keys take their default values.
pub fn load_config_file(path: &Path) -> Result<LoaderConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("parse config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Applies command-line values on top of `config`.
#[must_use]
pub fn apply_overrides(mut config: LoaderConfig, overrides: ConfigOverrides) -> LoaderConfig {
    if let Some(source_dir) = overrides.source_dir {
        config.source_dir = source_dir;
    }
    if let Some(path) = overrides.db_path {
        config.db_target.path = path;
    }
    if overrides.no_create {
        config.db_target.create_if_missing = false;
    }
    if let Some(batch_size) = overrides.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(max_text_len) = overrides.max_text_len {
        config.max_text_len = max_text_len;
    }
    if let Some(max_ident_len) = overrides.max_ident_len {
        config.max_ident_len = max_ident_len;
    }
    if let Some(extension) = overrides.extension {
        config.extension = extension;
    }
    config
}

/// Resolves the final, validated configuration.
pub fn resolve_config(file: Option<&Path>, overrides: ConfigOverrides) -> Result<LoaderConfig> {
    let base = match file {
        Some(path) => load_config_file(path)?,
        None => LoaderConfig::default(),
    };
    let config = apply_overrides(base, overrides);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn flags_override_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabload.toml");
        fs::write(
            &path,
            "source_dir = \"exports\"\nbatch_size = 500\n\n[db_target]\npath = \"file.db\"\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            batch_size: Some(50),
            no_create: true,
            ..ConfigOverrides::default()
        };
        let config = resolve_config(Some(&path), overrides).unwrap();

        assert_eq!(config.source_dir, PathBuf::from("exports"));
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.db_target.path, PathBuf::from("file.db"));
        assert!(!config.db_target.create_if_missing);
        assert_eq!(config.max_text_len, 65_535);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let overrides = ConfigOverrides {
            batch_size: Some(0),
            ..ConfigOverrides::default()
        };
        let error = resolve_config(None, overrides).unwrap_err();
        assert!(error.to_string().contains("invalid configuration"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let error = resolve_config(Some(Path::new("/no/such/tabload.toml")), ConfigOverrides::default())
            .unwrap_err();
        assert!(error.to_string().contains("/no/such/tabload.toml"));
    }
}
