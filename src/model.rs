//! Data passed between the viewer, its shells and the hosting page.

use serde::{Deserialize, Serialize};
use vitrine_gesture::SwipeDirection;

/// A displayable image supplied by the caller.
///
/// The viewer never owns the product/cart data these come from; it only keeps
/// the list it was opened with until it closes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

impl ImageRef {
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
        }
    }
}

/// Direction the outgoing image slides towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    /// Outgoing image leaves to the left; used when moving forward
    Left,
    /// Outgoing image leaves to the right; used when moving backward
    Right,
}

impl SlideDirection {
    /// Direction implied by moving from `from` to `to` without an explicit hint.
    pub fn between(from: usize, to: usize) -> Self {
        if to >= from {
            SlideDirection::Left
        } else {
            SlideDirection::Right
        }
    }
}

impl From<SwipeDirection> for SlideDirection {
    fn from(swipe: SwipeDirection) -> Self {
        match swipe {
            SwipeDirection::Left => SlideDirection::Left,
            SwipeDirection::Right => SlideDirection::Right,
        }
    }
}

/// Load status of a single image, tracked apart from the transform state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Loading,
    Loaded,
    Error(String),
}

/// A user intent dispatched by keys, shell controls or gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerIntent {
    Close,
    Next,
    Previous,
    GoTo(usize),
    ZoomIn,
    ZoomOut,
    Rotate,
    Reset,
    Retry,
}

impl ViewerIntent {
    /// Display name for this intent.
    pub fn name(&self) -> &'static str {
        match self {
            ViewerIntent::Close => "Close",
            ViewerIntent::Next => "Next image",
            ViewerIntent::Previous => "Previous image",
            ViewerIntent::GoTo(_) => "Go to image",
            ViewerIntent::ZoomIn => "Zoom in",
            ViewerIntent::ZoomOut => "Zoom out",
            ViewerIntent::Rotate => "Rotate",
            ViewerIntent::Reset => "Reset",
            ViewerIntent::Retry => "Retry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_direction_between() {
        assert_eq!(SlideDirection::between(0, 1), SlideDirection::Left);
        assert_eq!(SlideDirection::between(3, 1), SlideDirection::Right);
    }

    #[test]
    fn test_image_ref_alt_defaults_to_empty() {
        let image: ImageRef = serde_json::from_str(r#"{"url": "a.png"}"#).unwrap();
        assert_eq!(image, ImageRef::new("a.png", ""));
    }
}
