//! vitrine_gesture - platform-independent gesture and transform engine
//!
//! Raw pointer, touch, wheel and keyboard events go in; semantic gesture
//! actions and clamped zoom/pan/rotation transforms come out. Nothing in this
//! crate renders, sleeps or touches the filesystem, so desktop and mobile
//! shells can share it unchanged.

pub mod constants;
mod event;
mod geometry;
pub mod gesture;
pub mod transform;

pub use event::{InputEvent, Key, MouseButton};
pub use geometry::{Point, Rectangle, Size};
pub use gesture::{GestureAction, GestureConfig, GestureContext, GestureInterpreter, SwipeDirection};
pub use transform::{RenderTransform, TransformState};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::event::{InputEvent, Key, MouseButton};
    pub use crate::geometry::{Point, Rectangle, Size};
    pub use crate::gesture::{
        GestureAction, GestureConfig, GestureContext, GestureInterpreter, SwipeDirection,
    };
    pub use crate::transform::{RenderTransform, TransformState};
}
