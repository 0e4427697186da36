//! Gesture interpreter: raw pointer/touch/wheel streams to semantic actions.
//!
//! The interpreter keeps only what is needed to classify the gesture in
//! progress (where and when it started, the last pinch distance, the previous
//! tap). Zoom and pan are read from the [`GestureContext`] supplied with every
//! event, never cached, so the interpreter cannot drift from the transform it
//! feeds.
//!
//! | Gesture     | Requirement                                                        |
//! |-------------|--------------------------------------------------------------------|
//! | drag-to-pan | zoom > 1; delta measured from the gesture start position           |
//! | pinch       | two touches; factor = current distance / last distance             |
//! | tap         | press shorter than 300 ms that moved less than 10 px               |
//! | double tap  | second tap within 500 ms and 50 px of the first                    |
//! | swipe       | one touch, < 300 ms, > 50 px, mostly horizontal, zoom exactly 1   |
//! | wheel       | ±0.2 zoom per tick                                                 |

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::constants::{
    DOUBLE_TAP_RADIUS, DOUBLE_TAP_WINDOW_MS, SWIPE_MAX_DURATION_MS, SWIPE_MIN_DISTANCE,
    TAP_MAX_DURATION_MS, TAP_MAX_MOVEMENT, WHEEL_ZOOM_STEP, ZOOM_EPSILON,
};
use crate::{InputEvent, MouseButton, Point, Rectangle, Size};

/// Direction a finger travelled during a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    /// Finger moved right-to-left (show the next image)
    Left,
    /// Finger moved left-to-right (show the previous image)
    Right,
}

/// Semantic action produced from raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Pan to `origin + delta`, where `origin` is the pan offset when the
    /// drag started and `delta` the pointer movement since then.
    Pan { origin: Point, delta: Point },
    /// Multiply zoom by this factor.
    PinchScale(f32),
    /// Double tap at `point`, relative to the container origin.
    DoubleTapZoomAt { point: Point, container: Size },
    /// Navigation request.
    Swipe(SwipeDirection),
    /// Add this signed amount to zoom.
    WheelZoom(f32),
}

/// Thresholds used for classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub tap_max_duration_ms: u64,
    pub tap_max_movement: f32,
    pub double_tap_window_ms: u64,
    pub double_tap_radius: f32,
    pub swipe_max_duration_ms: u64,
    pub swipe_min_distance: f32,
    pub wheel_zoom_step: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_max_duration_ms: TAP_MAX_DURATION_MS,
            tap_max_movement: TAP_MAX_MOVEMENT,
            double_tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            double_tap_radius: DOUBLE_TAP_RADIUS,
            swipe_max_duration_ms: SWIPE_MAX_DURATION_MS,
            swipe_min_distance: SWIPE_MIN_DISTANCE,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
        }
    }
}

/// Viewer state the interpreter needs to classify an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureContext {
    pub zoom: f32,
    pub pan: Point,
    /// Screen-space bounds of the image container
    pub container: Rectangle,
}

impl GestureContext {
    fn is_zoomed(&self) -> bool {
        self.zoom > 1.0 + ZOOM_EPSILON
    }

    fn is_unzoomed(&self) -> bool {
        (self.zoom - 1.0).abs() <= ZOOM_EPSILON
    }
}

/// A press (mouse button or single finger) in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    start: Point,
    start_time: Instant,
    pan_origin: Point,
    /// Drag-to-pan was allowed when the press began
    panning: bool,
}

/// Touch tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum TouchTrack {
    #[default]
    Idle,
    Single(Press),
    Pinch { last_distance: f32 },
}

/// A completed tap, kept to detect a following second tap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    position: Point,
    time: Instant,
}

/// Converts raw input streams into [`GestureAction`]s.
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    pointer: Option<Press>,
    touch: TouchTrack,
    last_tap: Option<Tap>,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether a mouse drag or single-finger pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.pointer.is_some_and(|p| p.panning)
            || matches!(self.touch, TouchTrack::Single(p) if p.panning)
    }

    /// Whether a two-finger pinch is in progress.
    pub fn is_pinching(&self) -> bool {
        matches!(self.touch, TouchTrack::Pinch { .. })
    }

    /// Drop any gesture in progress and forget the previous tap.
    pub fn cancel(&mut self) {
        self.pointer = None;
        self.touch = TouchTrack::Idle;
        self.last_tap = None;
    }

    /// Feed one event. Returns the action it completes, if any.
    pub fn handle(&mut self, event: &InputEvent, ctx: &GestureContext) -> Option<GestureAction> {
        match event {
            InputEvent::PointerDown {
                button: MouseButton::Left,
                position,
                time,
            } => {
                self.pointer = Some(Press {
                    start: *position,
                    start_time: *time,
                    pan_origin: ctx.pan,
                    panning: ctx.is_zoomed(),
                });
                None
            }

            InputEvent::PointerMove { position, .. } => {
                let press = self.pointer?;
                press.panning.then(|| GestureAction::Pan {
                    origin: press.pan_origin,
                    delta: *position - press.start,
                })
            }

            InputEvent::PointerUp {
                button: MouseButton::Left,
                position,
                time,
            } => {
                let press = self.pointer.take()?;
                self.finish_press(&press, *position, *time, ctx)
            }

            InputEvent::Wheel { delta_y, .. } => {
                if *delta_y > 0.0 {
                    Some(GestureAction::WheelZoom(-self.config.wheel_zoom_step))
                } else if *delta_y < 0.0 {
                    Some(GestureAction::WheelZoom(self.config.wheel_zoom_step))
                } else {
                    None
                }
            }

            InputEvent::TouchStart { touches, time } => {
                self.touch_start(touches, *time, ctx);
                None
            }

            InputEvent::TouchMove { touches, .. } => self.touch_move(touches),

            InputEvent::TouchEnd {
                remaining,
                lifted,
                time,
            } => self.touch_end(remaining, *lifted, *time, ctx),

            _ => None,
        }
    }

    fn touch_start(&mut self, touches: &[Point], time: Instant, ctx: &GestureContext) {
        match touches {
            [] => self.touch = TouchTrack::Idle,
            [single] => {
                self.touch = TouchTrack::Single(Press {
                    start: *single,
                    start_time: time,
                    pan_origin: ctx.pan,
                    panning: ctx.is_zoomed(),
                });
            }
            [first, second, ..] => {
                self.touch = TouchTrack::Pinch {
                    last_distance: first.distance_to(*second),
                };
            }
        }
    }

    fn touch_move(&mut self, touches: &[Point]) -> Option<GestureAction> {
        match (&mut self.touch, touches) {
            (TouchTrack::Pinch { last_distance }, [first, second, ..]) => {
                let distance = first.distance_to(*second);
                if *last_distance <= f32::EPSILON {
                    *last_distance = distance;
                    return None;
                }
                let factor = distance / *last_distance;
                *last_distance = distance;
                Some(GestureAction::PinchScale(factor))
            }
            (TouchTrack::Single(press), [current, ..]) => {
                press.panning.then(|| GestureAction::Pan {
                    origin: press.pan_origin,
                    delta: *current - press.start,
                })
            }
            _ => None,
        }
    }

    fn touch_end(
        &mut self,
        remaining: &[Point],
        lifted: Point,
        time: Instant,
        ctx: &GestureContext,
    ) -> Option<GestureAction> {
        match std::mem::take(&mut self.touch) {
            TouchTrack::Pinch { last_distance } => {
                // Keep pinching while two fingers are still down; lifting one
                // of them ends the gesture without turning into a swipe.
                if remaining.len() >= 2 {
                    self.touch = TouchTrack::Pinch { last_distance };
                }
                None
            }
            TouchTrack::Single(press) => {
                if let Some(action) = self.classify_swipe(&press, lifted, time, ctx) {
                    self.last_tap = None;
                    return Some(action);
                }
                self.finish_press(&press, lifted, time, ctx)
            }
            TouchTrack::Idle => None,
        }
    }

    fn classify_swipe(
        &self,
        press: &Press,
        end: Point,
        time: Instant,
        ctx: &GestureContext,
    ) -> Option<GestureAction> {
        if !ctx.is_unzoomed() {
            return None;
        }
        let elapsed = time.saturating_duration_since(press.start_time);
        let delta = end - press.start;
        let quick = elapsed < Duration::from_millis(self.config.swipe_max_duration_ms);
        let far = delta.length() > self.config.swipe_min_distance;
        let horizontal = delta.x.abs() > delta.y.abs();

        if quick && far && horizontal {
            let direction = if delta.x < 0.0 {
                SwipeDirection::Left
            } else {
                SwipeDirection::Right
            };
            log::trace!("swipe {:?} ({:.0}px in {:?})", direction, delta.length(), elapsed);
            Some(GestureAction::Swipe(direction))
        } else {
            None
        }
    }

    /// Classify a finished press as tap/double tap.
    fn finish_press(
        &mut self,
        press: &Press,
        end: Point,
        time: Instant,
        ctx: &GestureContext,
    ) -> Option<GestureAction> {
        let elapsed = time.saturating_duration_since(press.start_time);
        let is_tap = elapsed < Duration::from_millis(self.config.tap_max_duration_ms)
            && end.distance_to(press.start) < self.config.tap_max_movement;

        if !is_tap {
            self.last_tap = None;
            return None;
        }

        let tap = Tap {
            position: end,
            time,
        };
        match self.last_tap.take() {
            Some(previous) if self.is_second_tap(&previous, &tap) => {
                Some(GestureAction::DoubleTapZoomAt {
                    point: ctx.container.to_local(end),
                    container: ctx.container.size(),
                })
            }
            _ => {
                self.last_tap = Some(tap);
                None
            }
        }
    }

    fn is_second_tap(&self, previous: &Tap, current: &Tap) -> bool {
        let gap = current.time.saturating_duration_since(previous.time);
        gap < Duration::from_millis(self.config.double_tap_window_ms)
            && current.position.distance_to(previous.position) < self.config.double_tap_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransformState;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn ctx(zoom: f32) -> GestureContext {
        GestureContext {
            zoom,
            pan: Point::zero(),
            container: Rectangle::new(0.0, 0.0, 400.0, 300.0),
        }
    }

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    fn click(
        interp: &mut GestureInterpreter,
        at: Point,
        down: Instant,
        up: Instant,
        ctx: &GestureContext,
    ) -> Option<GestureAction> {
        interp.handle(
            &InputEvent::PointerDown {
                button: MouseButton::Left,
                position: at,
                time: down,
            },
            ctx,
        );
        interp.handle(
            &InputEvent::PointerUp {
                button: MouseButton::Left,
                position: at,
                time: up,
            },
            ctx,
        )
    }

    fn swipe(
        interp: &mut GestureInterpreter,
        from: Point,
        to: Point,
        start: Instant,
        end: Instant,
        ctx: &GestureContext,
    ) -> Option<GestureAction> {
        interp.handle(
            &InputEvent::TouchStart {
                touches: vec![from],
                time: start,
            },
            ctx,
        );
        interp.handle(
            &InputEvent::TouchMove {
                touches: vec![to],
                time: end,
            },
            ctx,
        );
        interp.handle(
            &InputEvent::TouchEnd {
                remaining: vec![],
                lifted: to,
                time: end,
            },
            ctx,
        )
    }

    #[test]
    fn test_drag_pans_only_when_zoomed() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let unzoomed = ctx(1.0);
        interp.handle(
            &InputEvent::PointerDown {
                button: MouseButton::Left,
                position: Point::new(10.0, 10.0),
                time: t0,
            },
            &unzoomed,
        );
        let action = interp.handle(
            &InputEvent::PointerMove {
                position: Point::new(50.0, 10.0),
                time: ms(t0, 50),
            },
            &unzoomed,
        );
        assert_eq!(action, None);
        assert!(!interp.is_panning());
    }

    #[test]
    fn test_drag_delta_is_relative_to_start() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let mut zoomed = ctx(2.0);
        zoomed.pan = Point::new(5.0, 5.0);
        interp.handle(
            &InputEvent::PointerDown {
                button: MouseButton::Left,
                position: Point::new(100.0, 100.0),
                time: t0,
            },
            &zoomed,
        );
        assert!(interp.is_panning());

        interp.handle(
            &InputEvent::PointerMove {
                position: Point::new(110.0, 100.0),
                time: ms(t0, 16),
            },
            &zoomed,
        );
        let action = interp.handle(
            &InputEvent::PointerMove {
                position: Point::new(130.0, 90.0),
                time: ms(t0, 32),
            },
            &zoomed,
        );
        assert_eq!(
            action,
            Some(GestureAction::Pan {
                origin: Point::new(5.0, 5.0),
                delta: Point::new(30.0, -10.0),
            })
        );
    }

    #[test]
    fn test_pinch_scales_by_distance_ratio() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        interp.handle(
            &InputEvent::TouchStart {
                touches: vec![Point::new(100.0, 100.0), Point::new(200.0, 100.0)],
                time: t0,
            },
            &c,
        );
        assert!(interp.is_pinching());

        let action = interp.handle(
            &InputEvent::TouchMove {
                touches: vec![Point::new(100.0, 100.0), Point::new(250.0, 100.0)],
                time: ms(t0, 20),
            },
            &c,
        );
        let Some(GestureAction::PinchScale(factor)) = action else {
            panic!("expected pinch, got {:?}", action);
        };
        assert!(approx_eq(factor, 1.5));

        let mut transform = TransformState::identity();
        transform.apply(&GestureAction::PinchScale(factor));
        assert!(approx_eq(transform.zoom(), 1.5));
    }

    #[test]
    fn test_pinch_tracks_continuously() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        interp.handle(
            &InputEvent::TouchStart {
                touches: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
                time: t0,
            },
            &c,
        );
        interp.handle(
            &InputEvent::TouchMove {
                touches: vec![Point::new(0.0, 0.0), Point::new(200.0, 0.0)],
                time: ms(t0, 10),
            },
            &c,
        );
        // Second move is measured against the previous move, not the start.
        let action = interp.handle(
            &InputEvent::TouchMove {
                touches: vec![Point::new(0.0, 0.0), Point::new(300.0, 0.0)],
                time: ms(t0, 20),
            },
            &c,
        );
        let Some(GestureAction::PinchScale(factor)) = action else {
            panic!("expected pinch, got {:?}", action);
        };
        assert!(approx_eq(factor, 1.5));
    }

    #[test]
    fn test_lifting_one_pinch_finger_does_not_swipe() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        interp.handle(
            &InputEvent::TouchStart {
                touches: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
                time: t0,
            },
            &c,
        );
        let action = interp.handle(
            &InputEvent::TouchEnd {
                remaining: vec![Point::new(0.0, 0.0)],
                lifted: Point::new(300.0, 0.0),
                time: ms(t0, 50),
            },
            &c,
        );
        assert_eq!(action, None);
        assert!(!interp.is_pinching());
    }

    #[test]
    fn test_double_click_zooms_at_point() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = GestureContext {
            zoom: 1.0,
            pan: Point::zero(),
            container: Rectangle::new(50.0, 20.0, 400.0, 300.0),
        };
        let at = Point::new(150.0, 70.0);

        assert_eq!(click(&mut interp, at, t0, ms(t0, 80), &c), None);
        let action = click(&mut interp, at, ms(t0, 200), ms(t0, 260), &c);
        assert_eq!(
            action,
            Some(GestureAction::DoubleTapZoomAt {
                point: Point::new(100.0, 50.0),
                container: Size::new(400.0, 300.0),
            })
        );
    }

    #[test]
    fn test_slow_second_tap_is_not_double() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        let at = Point::new(100.0, 100.0);
        click(&mut interp, at, t0, ms(t0, 50), &c);
        assert_eq!(click(&mut interp, at, ms(t0, 600), ms(t0, 650), &c), None);
    }

    #[test]
    fn test_distant_second_tap_is_not_double() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        click(&mut interp, Point::new(10.0, 10.0), t0, ms(t0, 50), &c);
        let action = click(
            &mut interp,
            Point::new(100.0, 10.0),
            ms(t0, 100),
            ms(t0, 150),
            &c,
        );
        assert_eq!(action, None);
    }

    #[test]
    fn test_long_press_is_not_tap() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        let at = Point::new(10.0, 10.0);
        click(&mut interp, at, t0, ms(t0, 400), &c);
        assert_eq!(click(&mut interp, at, ms(t0, 450), ms(t0, 480), &c), None);
    }

    #[test]
    fn test_double_tap_on_touch() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        let at = Point::new(200.0, 150.0);
        assert_eq!(swipe(&mut interp, at, at, t0, ms(t0, 60), &c), None);
        let action = swipe(&mut interp, at, at, ms(t0, 150), ms(t0, 200), &c);
        assert!(matches!(
            action,
            Some(GestureAction::DoubleTapZoomAt { .. })
        ));
    }

    #[test]
    fn test_swipe_left_and_right() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        let left = swipe(
            &mut interp,
            Point::new(300.0, 100.0),
            Point::new(200.0, 110.0),
            t0,
            ms(t0, 150),
            &c,
        );
        assert_eq!(left, Some(GestureAction::Swipe(SwipeDirection::Left)));

        let right = swipe(
            &mut interp,
            Point::new(100.0, 100.0),
            Point::new(200.0, 90.0),
            ms(t0, 1000),
            ms(t0, 1100),
            &c,
        );
        assert_eq!(right, Some(GestureAction::Swipe(SwipeDirection::Right)));
    }

    #[test]
    fn test_swipe_disabled_when_zoomed() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(2.0);
        let action = swipe(
            &mut interp,
            Point::new(300.0, 100.0),
            Point::new(100.0, 100.0),
            t0,
            ms(t0, 100),
            &c,
        );
        assert!(!matches!(action, Some(GestureAction::Swipe(_))));
    }

    #[test]
    fn test_swipe_rejections() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        // Too slow
        assert_eq!(
            swipe(
                &mut interp,
                Point::new(300.0, 100.0),
                Point::new(100.0, 100.0),
                t0,
                ms(t0, 400),
                &c,
            ),
            None
        );
        // Too short
        assert_eq!(
            swipe(
                &mut interp,
                Point::new(300.0, 100.0),
                Point::new(270.0, 100.0),
                ms(t0, 1000),
                ms(t0, 1100),
                &c,
            ),
            None
        );
        // Mostly vertical
        assert_eq!(
            swipe(
                &mut interp,
                Point::new(100.0, 100.0),
                Point::new(140.0, 300.0),
                ms(t0, 2000),
                ms(t0, 2100),
                &c,
            ),
            None
        );
    }

    #[test]
    fn test_wheel_direction() {
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        let down = interp.handle(
            &InputEvent::Wheel {
                delta_y: 120.0,
                position: Point::zero(),
            },
            &c,
        );
        assert_eq!(down, Some(GestureAction::WheelZoom(-WHEEL_ZOOM_STEP)));
        let up = interp.handle(
            &InputEvent::Wheel {
                delta_y: -3.0,
                position: Point::zero(),
            },
            &c,
        );
        assert_eq!(up, Some(GestureAction::WheelZoom(WHEEL_ZOOM_STEP)));
    }

    #[test]
    fn test_cancel_drops_pending_tap() {
        let t0 = Instant::now();
        let mut interp = GestureInterpreter::default();
        let c = ctx(1.0);
        let at = Point::new(10.0, 10.0);
        click(&mut interp, at, t0, ms(t0, 50), &c);
        interp.cancel();
        assert_eq!(click(&mut interp, at, ms(t0, 100), ms(t0, 150), &c), None);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: GestureConfig = serde_json::from_str(r#"{"swipe_min_distance": 80.0}"#)
            .expect("partial config should parse");
        assert_eq!(config.swipe_min_distance, 80.0);
        assert_eq!(config.tap_max_duration_ms, TAP_MAX_DURATION_MS);
    }
}
