use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning a file into a dataset.
///
/// None of these escape [`crate::data::loader::load_purchases`]; they are
/// logged there and replaced by an empty dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file '{}' not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("could not decode '{}': {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("unexpected data in '{}': {reason}", path.display())]
    InvalidShape { path: PathBuf, reason: String },

    #[error("unexpected error while reading '{}': {source}", path.display())]
    UnexpectedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension '.{extension}' for '{}'", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
}

impl LoadError {
    /// Classify an I/O failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::UnexpectedIo { path, source }
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn shape(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
