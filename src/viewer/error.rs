//! Error types for viewer operations.

use thiserror::Error;

/// Errors returned when the viewer API is misused.
///
/// Navigation driven by keys, swipes and arrows wraps around the image list
/// and can never produce these; they only guard explicit caller requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// Attempted to open the viewer with no images
    #[error("Cannot open the viewer without images")]
    EmptyGallery,

    /// Index outside the image list
    #[error("Image index {index} is out of range for {len} images")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of images
        len: usize,
    },

    /// Operation requires an open viewer
    #[error("The viewer is closed")]
    Closed,
}
