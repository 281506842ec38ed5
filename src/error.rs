use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an assembly run. Any of these is fatal to the run that produced it.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("k-mer size must be greater than zero (got {k})")]
    InvalidKmerSize { k: usize },

    #[error("minimum overlap must be greater than zero (got {min_overlap})")]
    InvalidMinOverlap { min_overlap: usize },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input in `{}` at line {line}: {message}", path.display())]
    MalformedInput {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssemblyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssemblyError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
