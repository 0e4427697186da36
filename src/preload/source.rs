//! Image sources: resolve a URL to raw bytes.

use std::path::{Path, PathBuf};

use super::LoadError;

/// Fetches the raw bytes behind an image URL.
///
/// Implementations run on the decoder thread, so they must be `Send + Sync`.
pub trait ImageSource: Send + Sync {
    /// Unique identifier for this source (e.g., "file").
    fn id(&self) -> &'static str;

    /// Fetch the bytes for `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError>;
}

/// Reads images from the local filesystem.
///
/// Accepts plain paths and `file://` URLs. Relative paths are resolved
/// against the base directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    base_dir: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `dir`.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Map a URL to a filesystem path.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, LoadError> {
        let raw = match url.strip_prefix("file://") {
            Some(rest) => rest,
            None if url.contains("://") => return Err(LoadError::unsupported_scheme(url)),
            None => url,
        };

        let path = Path::new(raw);
        Ok(match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        })
    }
}

impl ImageSource for FileSource {
    fn id(&self) -> &'static str {
        "file"
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.resolve(url)?;
        std::fs::read(&path).map_err(|source| LoadError::Io { path, source })
    }
}

/// Decode `bytes` fully and return the image dimensions.
pub fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), LoadError> {
    let img = image::load_from_memory(bytes)?;
    Ok((img.width(), img.height()))
}
