//! Input listener registration.
//!
//! The viewer only consumes input while open. Opening registers the keyboard,
//! pointer and touch listeners; closing deregisters all of them, after which
//! events are dropped before reaching the gesture interpreter.

use vitrine_gesture::InputEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputListeners {
    keyboard: bool,
    pointer: bool,
    touch: bool,
}

impl InputListeners {
    pub fn register(&mut self) {
        self.keyboard = true;
        self.pointer = true;
        self.touch = true;
        log::debug!("Registered viewer input listeners");
    }

    pub fn deregister(&mut self) {
        if self.is_registered() {
            log::debug!("Deregistered viewer input listeners");
        }
        *self = Self::default();
    }

    pub fn is_registered(&self) -> bool {
        self.keyboard || self.pointer || self.touch
    }

    /// Whether a listener for this kind of event is registered.
    pub fn accepts(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyPressed { .. } => self.keyboard,
            InputEvent::PointerDown { .. }
            | InputEvent::PointerMove { .. }
            | InputEvent::PointerUp { .. }
            | InputEvent::Wheel { .. } => self.pointer,
            InputEvent::TouchStart { .. }
            | InputEvent::TouchMove { .. }
            | InputEvent::TouchEnd { .. } => self.touch,
        }
    }
}
