use std::path::PathBuf;

/// Errors that can occur in ruBimera.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("sequence table format error: {0}")]
    TableFormat(String),

    #[error("invalid sequence table: {what}: {detail}")]
    Validation { what: String, detail: String },

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl Error {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// Validation failure pinned to a sample or variant.
    pub fn validation(what: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            what: what.into(),
            detail: detail.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            path: PathBuf::from("<unknown>"),
        }
    }
}
