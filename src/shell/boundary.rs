//! Error boundary around a shell.
//!
//! Once the wrapped shell returns an error or panics, the boundary stops
//! calling it and renders a fallback dialog whose only action is a full
//! reload. No partial recovery of the shell's state is attempted.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use vitrine_gesture::InputEvent;
use web_time::Instant;

use super::{Control, Element, Frame, ShellError, ViewerShell};
use crate::viewer::ViewerView;

/// What the host must do after the user picks the fallback action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Tear down and rebuild the whole page (viewer and shell)
    ReloadPage,
}

/// Supervises a [`ViewerShell`], isolating its faults.
#[derive(Debug)]
pub struct ErrorBoundary<S> {
    inner: S,
    fault: Option<String>,
}

impl<S: ViewerShell> ErrorBoundary<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, fault: None }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Description of the fault that tripped the boundary.
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// The user chose to reload. Clears the fault; the host performs the
    /// returned action.
    pub fn reload(&mut self) -> RecoveryAction {
        if let Some(fault) = self.fault.take() {
            log::info!("Reloading after viewer fault: {}", fault);
        }
        RecoveryAction::ReloadPage
    }

    fn trip(&mut self, fault: String) {
        log::error!("Viewer shell '{}' failed: {}", self.inner.name(), fault);
        self.fault = Some(fault);
    }

    fn fallback(&self) -> Frame {
        let mut frame = Frame::new();
        frame.push(Element::Fallback {
            message: self
                .fault
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        });
        frame.push(Element::Control {
            control: Control::Reload,
            enabled: true,
        });
        frame
    }

    /// Run `f` against the inner shell, tripping on panic.
    fn guarded<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        if self.fault.is_some() {
            return None;
        }
        let inner = &mut self.inner;
        match panic::catch_unwind(AssertUnwindSafe(|| f(inner))) {
            Ok(result) => Some(result),
            Err(payload) => {
                self.trip(format!("panic: {}", panic_message(payload.as_ref())));
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl<S: ViewerShell> ViewerShell for ErrorBoundary<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// Never fails: inner errors become the fallback frame.
    fn render(&mut self, view: &ViewerView<'_>) -> Result<Frame, ShellError> {
        match self.guarded(|shell| shell.render(view)) {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(e)) => {
                self.trip(e.to_string());
                Ok(self.fallback())
            }
            None => Ok(self.fallback()),
        }
    }

    fn routes(&self, event: &InputEvent) -> bool {
        self.inner.routes(event)
    }

    fn observe(&mut self, event: &InputEvent, view: &ViewerView<'_>, now: Instant) {
        self.guarded(|shell| shell.observe(event, view, now));
    }

    fn tick(&mut self, now: Instant) {
        self.guarded(|shell| shell.tick(now));
    }

    fn next_deadline(&self) -> Option<Instant> {
        if self.is_faulted() {
            None
        } else {
            self.inner.next_deadline()
        }
    }
}
