use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to open environment file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error reading environment file '{path}': {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid entry in '{path}' at line {line_number}: {line}")]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    #[error("failed to deserialize settings: {0}")]
    Deserialize(#[from] serde::de::value::Error),
}
