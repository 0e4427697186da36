//! Error types for image fetching and decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching or decoding an image.
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error while reading a local image
    #[error("Failed to read {path:?}: {source}")]
    Io {
        /// Path that could not be read
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes were read but are not a decodable image
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// The URL uses a scheme this source cannot fetch
    #[error("Unsupported URL scheme in '{url}'")]
    UnsupportedScheme {
        /// The offending URL
        url: String,
    },

    /// The background decoder is gone
    #[error("Decoder thread unavailable: {0}")]
    Unavailable(String),
}

impl LoadError {
    /// Create an unsupported-scheme error.
    pub fn unsupported_scheme(url: impl Into<String>) -> Self {
        Self::UnsupportedScheme { url: url.into() }
    }
}
