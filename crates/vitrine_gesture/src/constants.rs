//! Centralized constants for vitrine_gesture
//!
//! All thresholds used by the gesture interpreter and the transform clamps are
//! defined here so both shells agree on them.

// =============================================================================
// Zoom
// =============================================================================

/// Smallest zoom factor any operation may produce
pub const ZOOM_MIN: f32 = 0.5;

/// Largest zoom factor any operation may produce
pub const ZOOM_MAX: f32 = 5.0;

/// Zoom increment for the zoom buttons and the `+`/`-` keys
pub const ZOOM_STEP: f32 = 0.5;

/// Zoom increment per wheel tick
pub const WHEEL_ZOOM_STEP: f32 = 0.2;

/// Zoom level a double tap jumps to from the unzoomed state
pub const DOUBLE_TAP_ZOOM: f32 = 2.0;

// =============================================================================
// Rotation
// =============================================================================

/// Degrees added by a single rotate action
pub const ROTATE_STEP_DEGREES: i32 = 90;

// =============================================================================
// Tap / Double Tap
// =============================================================================

/// A press shorter than this may count as a tap
pub const TAP_MAX_DURATION_MS: u64 = 300;

/// A press that moved less than this (pixels) may count as a tap
pub const TAP_MAX_MOVEMENT: f32 = 10.0;

/// Two taps closer together in time than this form a double tap
pub const DOUBLE_TAP_WINDOW_MS: u64 = 500;

/// Two taps closer together in space than this (pixels) form a double tap
pub const DOUBLE_TAP_RADIUS: f32 = 50.0;

// =============================================================================
// Swipe
// =============================================================================

/// A swipe must complete within this duration
pub const SWIPE_MAX_DURATION_MS: u64 = 300;

/// A swipe must travel further than this (pixels, straight line)
pub const SWIPE_MIN_DISTANCE: f32 = 50.0;

/// Tolerance used when comparing zoom against the unzoomed level
pub const ZOOM_EPSILON: f32 = 1e-4;
