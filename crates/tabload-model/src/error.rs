use thiserror::Error;

/// Invalid run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("batch_size must be at least 1")]
    ZeroBatchSize,
    #[error("max_text_len must be at least 1")]
    ZeroTextLength,
    #[error("max_ident_len {value} is below the minimum of {min}")]
    IdentifierTooShort { value: usize, min: usize },
    #[error("extension must not be empty")]
    EmptyExtension,
}
