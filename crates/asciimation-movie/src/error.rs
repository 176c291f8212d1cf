//! Errors raised while loading a movie.

use std::path::PathBuf;

/// Error type for movie loading.
#[derive(Debug, thiserror::Error)]
pub enum MovieError {
    /// The movie file could not be opened.
    #[error("Failed to open movie file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not gzip-compressed.
    #[error("Movie file {path:?} is not gzip-compressed")]
    NotGzip { path: PathBuf },

    /// Reading or decompressing failed before any line was parsed.
    #[error("Failed to read movie: {0}")]
    Read(#[from] std::io::Error),

    /// A frame could not be serialized.
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

impl MovieError {
    pub fn open<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub fn not_gzip<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotGzip { path: path.into() }
    }
}

/// Result type alias using [`MovieError`].
pub type Result<T> = std::result::Result<T, MovieError>;
