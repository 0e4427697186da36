//! Device selection behind a single error boundary.

use vitrine_gesture::InputEvent;
use web_time::Instant;

use super::{
    DesktopShell, ErrorBoundary, Frame, MobileShell, RecoveryAction, ShellError, ViewerShell,
};
use crate::config::{DeviceClass, DevicePreference, UserPreferences};
use crate::viewer::ViewerView;

/// Either device-specific shell.
#[derive(Debug)]
pub enum DeviceShell {
    Desktop(DesktopShell),
    Mobile(MobileShell),
}

impl DeviceShell {
    pub fn for_class(class: DeviceClass, preferences: &UserPreferences) -> Self {
        match class {
            DeviceClass::Desktop => {
                DeviceShell::Desktop(DesktopShell::from_preferences(preferences))
            }
            DeviceClass::Mobile => {
                DeviceShell::Mobile(MobileShell::new(preferences.thumbnail_hide_delay()))
            }
        }
    }

    pub fn class(&self) -> DeviceClass {
        match self {
            DeviceShell::Desktop(_) => DeviceClass::Desktop,
            DeviceShell::Mobile(_) => DeviceClass::Mobile,
        }
    }

    fn shell(&self) -> &dyn ViewerShell {
        match self {
            DeviceShell::Desktop(shell) => shell,
            DeviceShell::Mobile(shell) => shell,
        }
    }

    fn shell_mut(&mut self) -> &mut dyn ViewerShell {
        match self {
            DeviceShell::Desktop(shell) => shell,
            DeviceShell::Mobile(shell) => shell,
        }
    }
}

impl ViewerShell for DeviceShell {
    fn name(&self) -> &'static str {
        self.shell().name()
    }

    fn render(&mut self, view: &ViewerView<'_>) -> Result<Frame, ShellError> {
        self.shell_mut().render(view)
    }

    fn routes(&self, event: &InputEvent) -> bool {
        self.shell().routes(event)
    }

    fn observe(&mut self, event: &InputEvent, view: &ViewerView<'_>, now: Instant) {
        self.shell_mut().observe(event, view, now);
    }

    fn tick(&mut self, now: Instant) {
        self.shell_mut().tick(now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.shell().next_deadline()
    }
}

/// The shell hosts embed: picks desktop or mobile and isolates faults.
#[derive(Debug)]
pub struct UnifiedShell {
    preferences: UserPreferences,
    boundary: ErrorBoundary<DeviceShell>,
}

impl UnifiedShell {
    pub fn new(preferences: UserPreferences, viewport_width: f32) -> Self {
        let class = preferences.device.resolve(viewport_width);
        log::info!("Using {:?} viewer shell", class);
        let boundary = ErrorBoundary::new(DeviceShell::for_class(class, &preferences));
        Self {
            preferences,
            boundary,
        }
    }

    pub fn device_class(&self) -> DeviceClass {
        self.boundary.inner().class()
    }

    pub fn device_preference(&self) -> DevicePreference {
        self.preferences.device
    }

    /// React to a viewport resize. Swaps the shell when the device class
    /// changes; returns whether it did.
    pub fn set_viewport_width(&mut self, width: f32) -> bool {
        let class = self.preferences.device.resolve(width);
        if class == self.device_class() {
            return false;
        }
        log::info!("Switching viewer shell to {:?}", class);
        *self.boundary.inner_mut() = DeviceShell::for_class(class, &self.preferences);
        true
    }

    pub fn is_faulted(&self) -> bool {
        self.boundary.is_faulted()
    }

    pub fn reload(&mut self) -> RecoveryAction {
        self.boundary.reload()
    }
}

impl ViewerShell for UnifiedShell {
    fn name(&self) -> &'static str {
        "unified"
    }

    fn render(&mut self, view: &ViewerView<'_>) -> Result<Frame, ShellError> {
        self.boundary.render(view)
    }

    fn routes(&self, event: &InputEvent) -> bool {
        self.boundary.routes(event)
    }

    fn observe(&mut self, event: &InputEvent, view: &ViewerView<'_>, now: Instant) {
        self.boundary.observe(event, view, now);
    }

    fn tick(&mut self, now: Instant) {
        self.boundary.tick(now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.boundary.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_gesture::{Rectangle, TransformState};

    use crate::model::ImageStatus;
    use crate::shell::Control;
    use crate::shell::tests::viewer_with;
    use crate::viewer::{SlideState, ViewerPhase};

    fn prefs(device: DevicePreference) -> UserPreferences {
        UserPreferences {
            device,
            ..UserPreferences::default()
        }
    }

    #[test]
    fn test_auto_uses_breakpoint() {
        let shell = UnifiedShell::new(prefs(DevicePreference::Auto), 767.0);
        assert_eq!(shell.device_class(), DeviceClass::Mobile);
        let shell = UnifiedShell::new(prefs(DevicePreference::Auto), 768.0);
        assert_eq!(shell.device_class(), DeviceClass::Desktop);
    }

    #[test]
    fn test_forced_device_ignores_width() {
        let shell = UnifiedShell::new(prefs(DevicePreference::Desktop), 320.0);
        assert_eq!(shell.device_class(), DeviceClass::Desktop);
        let shell = UnifiedShell::new(prefs(DevicePreference::Mobile), 1920.0);
        assert_eq!(shell.device_class(), DeviceClass::Mobile);
    }

    #[test]
    fn test_resize_swaps_shell() {
        let mut shell = UnifiedShell::new(prefs(DevicePreference::Auto), 1280.0);
        assert!(!shell.set_viewport_width(1024.0));
        assert!(shell.set_viewport_width(400.0));
        assert_eq!(shell.device_class(), DeviceClass::Mobile);
    }

    #[test]
    fn test_renders_device_layout() {
        let viewer = viewer_with(3);
        let mut desktop = UnifiedShell::new(prefs(DevicePreference::Desktop), 1280.0);
        let mut mobile = UnifiedShell::new(prefs(DevicePreference::Mobile), 1280.0);

        assert!(desktop.render(&viewer.view()).unwrap().is_enabled(Control::Next));
        let frame = mobile.render(&viewer.view()).unwrap();
        assert!(frame.controls().all(|(c, _)| c != Control::Next));
        assert!(!desktop.is_faulted());
        assert!(!mobile.is_faulted());
    }

    #[test]
    fn test_wheel_zoom_is_desktop_only() {
        let wheel = InputEvent::Wheel {
            delta_y: -1.0,
            position: vitrine_gesture::Point::new(100.0, 100.0),
        };
        let mut shell = UnifiedShell::new(prefs(DevicePreference::Auto), 1280.0);
        assert!(shell.routes(&wheel));

        shell.set_viewport_width(400.0);
        assert!(!shell.routes(&wheel));
    }

    #[test]
    fn test_broken_view_shows_fallback() {
        let status = ImageStatus::Loading;
        let view = ViewerView {
            open: true,
            images: &[],
            selected_index: 2,
            transform: TransformState::identity(),
            slide: SlideState::Idle,
            phase: ViewerPhase::Loading,
            status: &status,
            container: Rectangle::default(),
        };
        let mut shell = UnifiedShell::new(prefs(DevicePreference::Desktop), 1280.0);

        let frame = shell.render(&view).unwrap();
        assert!(frame.has_fallback());
        assert!(shell.is_faulted());
        assert_eq!(shell.reload(), RecoveryAction::ReloadPage);
        assert!(!shell.is_faulted());
    }
}
