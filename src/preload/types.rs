//! Request and result types exchanged with a preloader.

/// Ask for `url` to be fetched and decoded.
///
/// `generation` identifies the viewer session that asked; results from an
/// older session are discarded by the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadRequest {
    pub generation: u64,
    pub url: String,
}

/// Result of a preload - either decoded dimensions or an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadResult {
    /// Successfully fetched and decoded
    Loaded {
        generation: u64,
        url: String,
        width: u32,
        height: u32,
    },
    /// Fetch or decode failed
    Failed {
        generation: u64,
        url: String,
        error: String,
    },
}

impl PreloadResult {
    pub fn url(&self) -> &str {
        match self {
            PreloadResult::Loaded { url, .. } | PreloadResult::Failed { url, .. } => url,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            PreloadResult::Loaded { generation, .. } | PreloadResult::Failed { generation, .. } => {
                *generation
            }
        }
    }
}
