use std::path::PathBuf;
use thiserror::Error;

/// Problems found while compiling rule tables into a [`super::NameCleaner`].
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern '{pattern}' matches the empty string")]
    EmptyMatch { pattern: String },

    #[error("Blank entry in {table}")]
    EmptyTerm { table: &'static str },
}

/// Problems loading rule tables from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rule file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Rules(#[from] RuleError),
}
