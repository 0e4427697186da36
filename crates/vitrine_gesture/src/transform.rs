//! Zoom, pan and rotation state for the displayed image.
//!
//! Every zoom-affecting operation clamps to [`ZOOM_MIN`, `ZOOM_MAX`]. Pan is
//! kept in screen pixels and only divided by the zoom factor when the render
//! transform is built, so a drag moves the image at the same speed regardless
//! of zoom. Rotation is an unbounded accumulator; only the rendered value is
//! reduced modulo 360.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DOUBLE_TAP_ZOOM, ROTATE_STEP_DEGREES, ZOOM_EPSILON, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};
use crate::gesture::GestureAction;
use crate::{Point, Size};

/// Clamp a zoom factor into the allowed range.
///
/// Non-finite input (NaN from a zero-distance pinch, for instance) falls back
/// to the unzoomed level instead of poisoning the state.
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(ZOOM_MIN, ZOOM_MAX)
    } else {
        1.0
    }
}

/// Transform applied to the currently displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransform")]
pub struct TransformState {
    zoom: f32,
    pan: Point,
    rotation: i32,
}

/// Unchecked serialized form; converted through [`TransformState::new`].
#[derive(Deserialize)]
struct RawTransform {
    zoom: f32,
    pan: Point,
    rotation: i32,
}

impl From<RawTransform> for TransformState {
    fn from(raw: RawTransform) -> Self {
        Self::new(raw.zoom, raw.pan, raw.rotation)
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformState {
    /// Create an identity transform (zoom=1, no pan, no rotation).
    pub fn identity() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::zero(),
            rotation: 0,
        }
    }

    /// Create a transform with the given values; zoom is clamped.
    pub fn new(zoom: f32, pan: Point, rotation: i32) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
            rotation,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Accumulated rotation in degrees (never wrapped).
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Rotation actually rendered, in `[0, 360)`.
    pub fn display_rotation(&self) -> i32 {
        self.rotation.rem_euclid(360)
    }

    /// Whether the image is magnified beyond its fitted size.
    pub fn is_zoomed(&self) -> bool {
        self.zoom > 1.0 + ZOOM_EPSILON
    }

    /// Whether the zoom factor is exactly the fitted level.
    pub fn is_unzoomed(&self) -> bool {
        (self.zoom - 1.0).abs() <= ZOOM_EPSILON
    }

    /// Zoom in by the button step.
    pub fn zoom_in(&mut self) {
        self.zoom = clamp_zoom(self.zoom + ZOOM_STEP);
    }

    /// Zoom out by the button step.
    pub fn zoom_out(&mut self) {
        self.zoom = clamp_zoom(self.zoom - ZOOM_STEP);
    }

    /// Add a signed delta to the zoom factor (wheel ticks).
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = clamp_zoom(self.zoom + delta);
    }

    /// Multiply the zoom factor (pinch).
    pub fn scale_by(&mut self, factor: f32) {
        self.zoom = clamp_zoom(self.zoom * factor);
    }

    /// Set the zoom factor directly.
    pub fn set_zoom_absolute(&mut self, zoom: f32) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Set the pan offset in screen pixels.
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Set pan to the offset a drag started from plus the drag's total delta.
    pub fn pan_from(&mut self, origin: Point, delta: Point) {
        self.pan = origin + delta;
    }

    /// Rotate clockwise by one step.
    ///
    /// On `i32` overflow the accumulator restarts from its value modulo 360,
    /// so the displayed angle keeps advancing.
    pub fn rotate(&mut self) {
        self.rotation = self
            .rotation
            .checked_add(ROTATE_STEP_DEGREES)
            .unwrap_or_else(|| self.rotation.rem_euclid(360) + ROTATE_STEP_DEGREES);
    }

    /// Explicit user reset: fitted zoom, no pan, no rotation.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Reset zoom and pan but keep the rotation.
    ///
    /// Used when navigating to another image and when a double tap zooms back
    /// out.
    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::zero();
    }

    /// Double-tap toggle.
    ///
    /// From the unzoomed level, jump to [`DOUBLE_TAP_ZOOM`] and pan so the
    /// tapped point (relative to the container origin) moves to the center.
    /// From any other level, fall back to [`reset_view`](Self::reset_view).
    pub fn toggle_double_tap(&mut self, tap: Point, container: Size) {
        if self.is_unzoomed() {
            let zoom = clamp_zoom(DOUBLE_TAP_ZOOM);
            self.pan = (container.center() - tap) * (zoom - 1.0);
            self.zoom = zoom;
        } else {
            self.reset_view();
        }
    }

    /// Apply a gesture action. Returns `true` if the transform changed.
    ///
    /// Swipes are navigation requests and never touch the transform.
    pub fn apply(&mut self, action: &GestureAction) -> bool {
        let before = *self;
        match *action {
            GestureAction::Pan { origin, delta } => self.pan_from(origin, delta),
            GestureAction::PinchScale(factor) => self.scale_by(factor),
            GestureAction::DoubleTapZoomAt { point, container } => {
                self.toggle_double_tap(point, container)
            }
            GestureAction::WheelZoom(delta) => self.zoom_by(delta),
            GestureAction::Swipe(_) => {}
        }
        *self != before
    }

    /// Build the transform used to draw the image.
    pub fn render_transform(&self) -> RenderTransform {
        RenderTransform {
            scale: self.zoom,
            translate_x: self.pan.x / self.zoom,
            translate_y: self.pan.y / self.zoom,
            rotation_deg: self.display_rotation(),
        }
    }
}

/// Draw-time transform: `scale`, then `translate` (in zoomed units), then `rotate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation_deg: i32,
}

impl RenderTransform {
    /// Format as a CSS transform string.
    pub fn to_css(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px) rotate({}deg)",
            self.scale, self.translate_x, self.translate_y, self.rotation_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = TransformState::identity();
        assert_eq!(t.zoom(), 1.0);
        assert_eq!(t.pan(), Point::zero());
        assert_eq!(t.rotation(), 0);
        assert!(t.is_unzoomed());
        assert!(!t.is_zoomed());
    }

    #[test]
    fn test_zoom_stays_in_range_under_repetition() {
        let mut t = TransformState::identity();
        for _ in 0..100 {
            t.zoom_in();
            assert!(t.zoom() >= ZOOM_MIN && t.zoom() <= ZOOM_MAX);
        }
        assert_eq!(t.zoom(), ZOOM_MAX);

        for _ in 0..100 {
            t.zoom_out();
            assert!(t.zoom() >= ZOOM_MIN && t.zoom() <= ZOOM_MAX);
        }
        assert_eq!(t.zoom(), ZOOM_MIN);
    }

    #[test]
    fn test_zoom_clamps_extreme_inputs() {
        let mut t = TransformState::identity();
        t.set_zoom_absolute(1000.0);
        assert_eq!(t.zoom(), ZOOM_MAX);
        t.set_zoom_absolute(-3.0);
        assert_eq!(t.zoom(), ZOOM_MIN);
        t.scale_by(1e9);
        assert_eq!(t.zoom(), ZOOM_MAX);
        t.zoom_by(-1e9);
        assert_eq!(t.zoom(), ZOOM_MIN);
        t.scale_by(f32::NAN);
        assert_eq!(t.zoom(), 1.0);
        t.scale_by(f32::INFINITY);
        assert_eq!(t.zoom(), 1.0);
    }

    #[test]
    fn test_wheel_steps() {
        let mut t = TransformState::identity();
        t.zoom_by(0.2);
        assert!(approx_eq(t.zoom(), 1.2));
        t.zoom_by(-0.2);
        t.zoom_by(-0.2);
        assert!(approx_eq(t.zoom(), 0.8));
    }

    #[test]
    fn test_reset_clears_rotation() {
        let mut t = TransformState::new(3.0, Point::new(40.0, -10.0), 270);
        t.reset();
        assert_eq!(t, TransformState::identity());
    }

    #[test]
    fn test_reset_view_keeps_rotation() {
        let mut t = TransformState::new(3.0, Point::new(40.0, -10.0), 180);
        t.reset_view();
        assert_eq!(t.zoom(), 1.0);
        assert_eq!(t.pan(), Point::zero());
        assert_eq!(t.rotation(), 180);
    }

    #[test]
    fn test_rotation_accumulates_and_wraps_on_display() {
        let mut t = TransformState::identity();
        for _ in 0..4 {
            t.rotate();
        }
        assert_eq!(t.rotation(), 360);
        assert_eq!(t.display_rotation(), 0);
        assert_eq!(t.render_transform().rotation_deg, 0);

        t.rotate();
        assert_eq!(t.rotation(), 450);
        assert_eq!(t.display_rotation(), 90);
    }

    #[test]
    fn test_rotation_survives_accumulator_overflow() {
        // Largest multiple of 90 below i32::MAX
        let mut t = TransformState::new(1.0, Point::zero(), 2_147_483_610);
        assert_eq!(t.display_rotation(), 90);

        t.rotate();
        assert_eq!(t.display_rotation(), 180);
        t.rotate();
        assert_eq!(t.display_rotation(), 270);
    }

    #[test]
    fn test_deserialize_clamps_zoom() {
        let t: TransformState = serde_json::from_str(
            r#"{"zoom": 50.0, "pan": {"x": 4.0, "y": -2.0}, "rotation": 90}"#,
        )
        .unwrap();
        assert_eq!(t.zoom(), ZOOM_MAX);
        assert_eq!(t.pan(), Point::new(4.0, -2.0));
        assert_eq!(t.rotation(), 90);

        let t: TransformState =
            serde_json::from_str(r#"{"zoom": 0.01, "pan": {"x": 0.0, "y": 0.0}, "rotation": 0}"#)
                .unwrap();
        assert_eq!(t.zoom(), ZOOM_MIN);
    }

    #[test]
    fn test_double_tap_zooms_to_tap_point() {
        let mut t = TransformState::identity();
        let container = Size::new(400.0, 300.0);
        t.toggle_double_tap(Point::new(100.0, 50.0), container);

        assert_eq!(t.zoom(), 2.0);
        // (center - tap) * (2 - 1) = (200 - 100, 150 - 50)
        assert!(approx_eq(t.pan().x, 100.0));
        assert!(approx_eq(t.pan().y, 100.0));
    }

    #[test]
    fn test_double_tap_twice_returns_to_unzoomed() {
        let mut t = TransformState::identity();
        t.rotate();
        let container = Size::new(400.0, 300.0);
        t.toggle_double_tap(Point::new(10.0, 10.0), container);
        t.toggle_double_tap(Point::new(10.0, 10.0), container);

        assert_eq!(t.zoom(), 1.0);
        assert_eq!(t.pan(), Point::zero());
        assert_eq!(t.rotation(), 90);
    }

    #[test]
    fn test_double_tap_from_zoomed_out_resets() {
        let mut t = TransformState::new(0.5, Point::zero(), 0);
        t.toggle_double_tap(Point::new(10.0, 10.0), Size::new(100.0, 100.0));
        assert_eq!(t.zoom(), 1.0);
    }

    #[test]
    fn test_pan_from_is_relative_to_origin() {
        let mut t = TransformState::new(2.0, Point::new(5.0, 5.0), 0);
        let origin = t.pan();
        // Repeated moves within one drag must not accumulate.
        t.pan_from(origin, Point::new(10.0, 0.0));
        t.pan_from(origin, Point::new(20.0, 0.0));
        assert_eq!(t.pan(), Point::new(25.0, 5.0));
    }

    #[test]
    fn test_render_transform_divides_pan_by_zoom() {
        let t = TransformState::new(2.0, Point::new(100.0, -40.0), 90);
        let render = t.render_transform();
        assert_eq!(render.scale, 2.0);
        assert!(approx_eq(render.translate_x, 50.0));
        assert!(approx_eq(render.translate_y, -20.0));
        assert_eq!(
            render.to_css(),
            "scale(2) translate(50px, -20px) rotate(90deg)"
        );
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut t = TransformState::identity();
        assert!(t.apply(&GestureAction::WheelZoom(0.2)));
        assert!(!t.apply(&GestureAction::Swipe(crate::SwipeDirection::Left)));
        assert!(t.apply(&GestureAction::PinchScale(1.5)));
        assert!(approx_eq(t.zoom(), 1.8));
    }
}
