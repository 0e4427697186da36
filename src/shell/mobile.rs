//! Mobile shell: full-viewport swipe carousel with a bottom control cluster.

use std::time::Duration;

use vitrine_gesture::{InputEvent, Point, RenderTransform, TransformState};
use web_time::Instant;

use super::{
    Control, Element, Frame, ShellError, ViewerShell, checked_transform, counter, current_image,
    image_at, image_element, status_element, thumbnails, transform_controls, transition,
};
use crate::config::ThumbnailOrientation;
use crate::constants::{THUMBNAIL_HIDE_MAX_MS, THUMBNAIL_HIDE_MIN_MS};
use crate::model::SlideDirection;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::viewer::{ViewerView, next_index, previous_index};

/// Shows the thumbnail strip on interaction and hides it after a delay.
///
/// Every interaction cancels the pending hide and schedules a new one.
#[derive(Debug)]
pub struct ThumbnailAutoHide {
    delay: Duration,
    visible: bool,
    timers: Scheduler<()>,
    hide_task: Option<TaskHandle>,
}

impl ThumbnailAutoHide {
    /// Create a hidden strip. `delay` is clamped to the allowed range.
    pub fn new(delay: Duration) -> Self {
        let min = Duration::from_millis(THUMBNAIL_HIDE_MIN_MS);
        let max = Duration::from_millis(THUMBNAIL_HIDE_MAX_MS);
        Self {
            delay: delay.clamp(min, max),
            visible: false,
            timers: Scheduler::new(),
            hide_task: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the strip and restart the hide countdown.
    pub fn show(&mut self, now: Instant) {
        if let Some(task) = self.hide_task.take() {
            self.timers.cancel(task);
        }
        self.visible = true;
        self.hide_task = Some(self.timers.schedule(now, self.delay, ()));
    }

    /// Hide immediately and drop the countdown.
    pub fn hide(&mut self) {
        self.timers.cancel_all();
        self.hide_task = None;
        self.visible = false;
    }

    pub fn tick(&mut self, now: Instant) {
        if !self.timers.take_due(now).is_empty() {
            self.hide_task = None;
            self.visible = false;
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due()
    }
}

/// Shell for touch devices.
#[derive(Debug)]
pub struct MobileShell {
    thumbnails: ThumbnailAutoHide,
}

impl MobileShell {
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            thumbnails: ThumbnailAutoHide::new(hide_delay),
        }
    }

    pub fn thumbnails(&self) -> &ThumbnailAutoHide {
        &self.thumbnails
    }

    /// Carousel slides as `(index, offset_pct)`, current image first.
    ///
    /// At rest the neighbours sit one viewport to either side. During a
    /// transition the outgoing image is parked where it slides to and the
    /// incoming one is centred.
    pub fn slides(view: &ViewerView<'_>) -> Vec<(usize, f32)> {
        let current = view.selected_index;
        let len = view.images.len();
        match (view.slide.direction(), view.slide.next_index()) {
            (Some(direction), Some(target)) => {
                let parked = match direction {
                    SlideDirection::Left => -100.0,
                    SlideDirection::Right => 100.0,
                };
                vec![(current, parked), (target, 0.0)]
            }
            _ if len > 1 => vec![
                (current, 0.0),
                (previous_index(current, len), -100.0),
                (next_index(current, len), 100.0),
            ],
            _ => vec![(current, 0.0)],
        }
    }
}

impl ViewerShell for MobileShell {
    fn name(&self) -> &'static str {
        "mobile"
    }

    fn render(&mut self, view: &ViewerView<'_>) -> Result<Frame, ShellError> {
        let mut frame = Frame::new();
        if !view.open {
            self.thumbnails.hide();
            return Ok(frame);
        }

        let current = current_image(view)?;
        let transform = checked_transform(&view.transform)?;
        // Off-screen slides share the rotation but are never zoomed
        let resting: RenderTransform =
            TransformState::new(1.0, Point::zero(), view.transform.rotation()).render_transform();

        for (index, offset) in Self::slides(view) {
            if index == view.selected_index && offset == 0.0 {
                frame.push(image_element(current, transform, offset));
            } else {
                frame.push(image_element(image_at(view, index)?, resting, offset));
            }
        }
        frame.extend(status_element(view));
        frame.extend(transition(view));

        frame.extend(transform_controls(view));
        frame.push(Element::Control {
            control: Control::Close,
            enabled: true,
        });
        frame.push(counter(view));

        if view.images.len() > 1 {
            frame.push(Element::ThumbnailStrip {
                orientation: ThumbnailOrientation::Horizontal,
                items: thumbnails(view),
                visible: self.thumbnails.is_visible(),
            });
        }
        Ok(frame)
    }

    /// Wheel zoom is desktop-only.
    fn routes(&self, event: &InputEvent) -> bool {
        !matches!(event, InputEvent::Wheel { .. })
    }

    fn observe(&mut self, event: &InputEvent, view: &ViewerView<'_>, now: Instant) {
        if !view.open {
            return;
        }
        if !matches!(event, InputEvent::KeyPressed { .. }) {
            self.thumbnails.show(now);
        }
    }

    fn tick(&mut self, now: Instant) {
        self.thumbnails.tick(now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.thumbnails.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::tests::viewer_with;

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    fn touch(at: Instant) -> InputEvent {
        InputEvent::TouchStart {
            touches: vec![Point::new(10.0, 10.0)],
            time: at,
        }
    }

    fn strip_visible(frame: &Frame) -> Option<bool> {
        frame.elements.iter().find_map(|e| match e {
            Element::ThumbnailStrip { visible, .. } => Some(*visible),
            _ => None,
        })
    }

    #[test]
    fn test_hide_delay_is_clamped() {
        assert_eq!(
            ThumbnailAutoHide::new(Duration::from_millis(100)).delay(),
            Duration::from_millis(1200)
        );
        assert_eq!(
            ThumbnailAutoHide::new(Duration::from_secs(10)).delay(),
            Duration::from_millis(3000)
        );
        assert_eq!(
            ThumbnailAutoHide::new(Duration::from_millis(2000)).delay(),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_auto_hide_restarts_on_interaction() {
        let t0 = Instant::now();
        let mut strip = ThumbnailAutoHide::new(Duration::from_millis(1500));
        assert!(!strip.is_visible());

        strip.show(t0);
        strip.tick(ms(t0, 1000));
        assert!(strip.is_visible());

        strip.show(ms(t0, 1000));
        strip.tick(ms(t0, 1600));
        assert!(strip.is_visible());
        assert_eq!(strip.next_deadline(), Some(ms(t0, 2500)));

        strip.tick(ms(t0, 2500));
        assert!(!strip.is_visible());
        assert_eq!(strip.next_deadline(), None);
    }

    #[test]
    fn test_interaction_shows_strip() {
        let t0 = Instant::now();
        let viewer = viewer_with(3);
        let mut shell = MobileShell::new(Duration::from_millis(1200));

        let frame = shell.render(&viewer.view()).unwrap();
        assert_eq!(strip_visible(&frame), Some(false));

        shell.observe(&touch(t0), &viewer.view(), t0);
        let frame = shell.render(&viewer.view()).unwrap();
        assert_eq!(strip_visible(&frame), Some(true));

        shell.tick(ms(t0, 1200));
        let frame = shell.render(&viewer.view()).unwrap();
        assert_eq!(strip_visible(&frame), Some(false));
    }

    #[test]
    fn test_keys_do_not_show_strip() {
        let t0 = Instant::now();
        let viewer = viewer_with(3);
        let mut shell = MobileShell::new(Duration::from_millis(1200));
        shell.observe(
            &InputEvent::KeyPressed {
                key: vitrine_gesture::Key::Right,
            },
            &viewer.view(),
            t0,
        );
        assert!(!shell.thumbnails().is_visible());
    }

    #[test]
    fn test_wheel_is_not_routed() {
        let shell = MobileShell::new(Duration::from_millis(1200));
        let wheel = InputEvent::Wheel {
            delta_y: -1.0,
            position: Point::new(10.0, 10.0),
        };
        assert!(!shell.routes(&wheel));
        assert!(shell.routes(&touch(Instant::now())));
        assert!(shell.routes(&InputEvent::KeyPressed {
            key: vitrine_gesture::Key::Right,
        }));
    }

    #[test]
    fn test_carousel_at_rest() {
        let viewer = viewer_with(4);
        assert_eq!(
            MobileShell::slides(&viewer.view()),
            vec![(0, 0.0), (3, -100.0), (1, 100.0)]
        );
        let single = viewer_with(1);
        assert_eq!(MobileShell::slides(&single.view()), vec![(0, 0.0)]);
    }

    #[test]
    fn test_carousel_during_transition() {
        let t0 = Instant::now();
        let mut viewer = viewer_with(4);
        viewer.next(t0);
        assert_eq!(
            MobileShell::slides(&viewer.view()),
            vec![(0, -100.0), (1, 0.0)]
        );

        viewer.tick(ms(t0, 300));
        viewer.previous(ms(t0, 400));
        assert_eq!(
            MobileShell::slides(&viewer.view()),
            vec![(1, 100.0), (0, 0.0)]
        );
    }

    #[test]
    fn test_render_bottom_controls() {
        let viewer = viewer_with(2);
        let mut shell = MobileShell::new(Duration::from_millis(1200));
        let frame = shell.render(&viewer.view()).unwrap();

        assert!(frame.is_enabled(Control::ZoomIn));
        assert!(frame.is_enabled(Control::Rotate));
        assert!(frame.is_enabled(Control::Close));
        assert!(frame.controls().all(|(c, _)| c != Control::Next));
        assert!(frame.elements.contains(&Element::Counter { current: 1, total: 2 }));
    }

    #[test]
    fn test_closing_hides_strip() {
        let t0 = Instant::now();
        let mut viewer = viewer_with(3);
        let mut shell = MobileShell::new(Duration::from_millis(1200));
        shell.observe(&touch(t0), &viewer.view(), t0);

        viewer.close();
        assert!(shell.render(&viewer.view()).unwrap().is_empty());
        assert!(!shell.thumbnails().is_visible());
        assert_eq!(shell.next_deadline(), None);
    }
}
