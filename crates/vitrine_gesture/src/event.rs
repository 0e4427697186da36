//! Raw input events fed into the gesture interpreter.

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::Point;

/// Events the viewer can respond to.
///
/// Pointer and touch events carry the timestamp at which the host observed
/// them; tap, double-tap and swipe classification is purely a function of
/// these timestamps, never of the wall clock at processing time.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse/pen button pressed.
    PointerDown {
        button: MouseButton,
        position: Point,
        time: Instant,
    },
    /// Pointer moved (pressed or not).
    PointerMove { position: Point, time: Instant },
    /// Mouse/pen button released.
    PointerUp {
        button: MouseButton,
        position: Point,
        time: Instant,
    },
    /// Wheel scrolled. Positive `delta_y` scrolls down (zooms out).
    Wheel { delta_y: f32, position: Point },
    /// One or more fingers touched down; `touches` lists all active touches.
    TouchStart { touches: Vec<Point>, time: Instant },
    /// Active touches moved.
    TouchMove { touches: Vec<Point>, time: Instant },
    /// A finger lifted at `lifted`; `remaining` lists touches still down.
    TouchEnd {
        remaining: Vec<Point>,
        lifted: Point,
        time: Instant,
    },
    /// Keyboard key pressed.
    KeyPressed { key: Key },
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Keyboard keys the viewer can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Space,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

impl Key {
    /// Display label used in help overlays and settings.
    pub fn label(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Escape => "Esc".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Space => "Space".to_string(),
            Key::Left => "←".to_string(),
            Key::Right => "→".to_string(),
            Key::Up => "↑".to_string(),
            Key::Down => "↓".to_string(),
            Key::Home => "Home".to_string(),
            Key::End => "End".to_string(),
        }
    }
}
