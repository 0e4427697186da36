//! Global constants for the viewer application

/// Duration of the slide transition between two images
pub const SLIDE_DURATION_MS: u64 = 300;

/// Delay between an index change and preloading its neighbours
pub const PRELOAD_DEBOUNCE_MS: u64 = 100;

/// Shortest allowed thumbnail auto-hide delay (mobile)
pub const THUMBNAIL_HIDE_MIN_MS: u64 = 1200;

/// Longest allowed thumbnail auto-hide delay (mobile)
pub const THUMBNAIL_HIDE_MAX_MS: u64 = 3000;

/// Default thumbnail auto-hide delay (mobile)
pub const DEFAULT_THUMBNAIL_HIDE_MS: u64 = THUMBNAIL_HIDE_MAX_MS;

/// Viewports narrower than this use the mobile shell
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Default magnification of the desktop hover-zoom lens
pub const DEFAULT_HOVER_ZOOM_SCALE: f32 = 2.5;

/// Supported image file extensions for the native driver.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif"];
