use std::path::PathBuf;

use thiserror::Error;

/// Result type for dataset splitting operations
pub type SplitResult<T> = Result<T, SplitError>;

/// Error types for config loading, key extraction, splitting and copying
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("part names count ({names}) != part sizes count ({sizes})")]
    PartCountMismatch { names: usize, sizes: usize },
    #[error("invalid part sizes: {0}")]
    InvalidPartSizes(String),
    #[error("invalid filename template: {0}")]
    Pattern(#[from] regex::Error),
    #[error("image names != annotation names at sorted position {index}: {image} != {annotation}")]
    TemplateMismatch {
        index: usize,
        image: String,
        annotation: String,
    },
    #[error("no filename registered for key '{0}'")]
    MissingKey(String),
    #[error("destination file already exists: {0}")]
    DestinationExists(PathBuf),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::Io {
            path: path.into(),
            source,
        }
    }
}
