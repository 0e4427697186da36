//! Desktop shell: fixed thumbnail strip, side arrows and hover-zoom.

use vitrine_gesture::{InputEvent, Point, Rectangle};
use web_time::Instant;

use super::{
    Control, Element, Frame, ShellError, ViewerShell, checked_transform, counter, current_image,
    image_element, status_element, thumbnails, transform_controls, transition,
};
use crate::config::{ThumbnailOrientation, UserPreferences};
use crate::viewer::{ViewerPhase, ViewerView};

/// Maps the cursor over the image to a magnified lens origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverZoom {
    pub scale: f32,
}

impl HoverZoom {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Lens origin in percent of the container, or `None` outside it.
    pub fn origin(&self, cursor: Point, container: Rectangle) -> Option<(f32, f32)> {
        if !container.contains(cursor) || container.width <= 0.0 || container.height <= 0.0 {
            return None;
        }
        let local = container.to_local(cursor);
        let x = (local.x / container.width * 100.0).clamp(0.0, 100.0);
        let y = (local.y / container.height * 100.0).clamp(0.0, 100.0);
        Some((x, y))
    }
}

/// Shell for pointer devices.
#[derive(Debug, Clone)]
pub struct DesktopShell {
    orientation: ThumbnailOrientation,
    hover_zoom: Option<HoverZoom>,
    cursor: Option<Point>,
}

impl DesktopShell {
    pub fn new(orientation: ThumbnailOrientation, hover_zoom: Option<HoverZoom>) -> Self {
        Self {
            orientation,
            hover_zoom,
            cursor: None,
        }
    }

    pub fn from_preferences(preferences: &UserPreferences) -> Self {
        let hover_zoom = preferences
            .hover_zoom
            .then(|| HoverZoom::new(preferences.hover_zoom_scale));
        Self::new(preferences.thumbnail_orientation, hover_zoom)
    }

    pub fn orientation(&self) -> ThumbnailOrientation {
        self.orientation
    }

    /// Lens shown in place of gesture zoom while the image is unzoomed.
    fn hover_lens(&self, view: &ViewerView<'_>, url: &str) -> Option<Element> {
        let hover = self.hover_zoom?;
        if view.phase != ViewerPhase::Ready || view.transform.is_zoomed() {
            return None;
        }
        let (origin_x_pct, origin_y_pct) = hover.origin(self.cursor?, view.container)?;
        Some(Element::HoverLens {
            url: url.to_string(),
            origin_x_pct,
            origin_y_pct,
            scale: hover.scale,
        })
    }
}

impl ViewerShell for DesktopShell {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn render(&mut self, view: &ViewerView<'_>) -> Result<Frame, ShellError> {
        let mut frame = Frame::new();
        if !view.open {
            return Ok(frame);
        }

        let image = current_image(view)?;
        frame.push(image_element(image, checked_transform(&view.transform)?, 0.0));
        frame.extend(status_element(view));
        frame.extend(transition(view));
        frame.extend(self.hover_lens(view, &image.url));

        let can_navigate = view.images.len() > 1 && view.phase != ViewerPhase::Navigating;
        frame.push(Element::Control {
            control: Control::Previous,
            enabled: can_navigate,
        });
        frame.push(Element::Control {
            control: Control::Next,
            enabled: can_navigate,
        });
        frame.extend(transform_controls(view));
        frame.push(Element::Control {
            control: Control::Close,
            enabled: true,
        });
        frame.push(counter(view));

        if view.images.len() > 1 {
            frame.push(Element::ThumbnailStrip {
                orientation: self.orientation,
                items: thumbnails(view),
                visible: true,
            });
        }
        Ok(frame)
    }

    fn observe(&mut self, event: &InputEvent, view: &ViewerView<'_>, _now: Instant) {
        match event {
            InputEvent::PointerMove { position, .. } | InputEvent::PointerDown { position, .. } => {
                self.cursor = view.container.contains(*position).then_some(*position);
            }
            InputEvent::TouchStart { .. } => self.cursor = None,
            _ => {}
        }
    }
}
