//! Presentation shells.
//!
//! A shell turns a [`ViewerView`] into a [`Frame`]. The desktop and mobile
//! shells share the transform semantics of the viewer and differ only in
//! layout and affordances: hover-zoom and a fixed thumbnail strip on desktop,
//! a swipe carousel with bottom controls and an auto-hiding strip on mobile.
//! [`UnifiedShell`] picks one of them per device and runs it inside an
//! [`ErrorBoundary`].

mod boundary;
mod desktop;
mod frame;
mod mobile;
mod unified;

use thiserror::Error;
use vitrine_gesture::{InputEvent, RenderTransform, TransformState};
use web_time::Instant;

use crate::model::{ImageRef, ImageStatus};
use crate::viewer::{ViewerPhase, ViewerView};

pub use boundary::{ErrorBoundary, RecoveryAction};
pub use desktop::{DesktopShell, HoverZoom};
pub use frame::{Control, Element, Frame, Thumbnail};
pub use mobile::{MobileShell, ThumbnailAutoHide};
pub use unified::{DeviceShell, UnifiedShell};

/// Faults raised while rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShellError {
    /// The view points at an image that is not in the list
    #[error("No image at index {index} (gallery has {len})")]
    MissingImage { index: usize, len: usize },

    /// The transform cannot be drawn
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
}

/// Renders viewer state and observes raw input for shell-local behaviour.
pub trait ViewerShell {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Build the frame for the current state. Closed viewers render nothing.
    fn render(&mut self, view: &ViewerView<'_>) -> Result<Frame, ShellError>;

    /// Whether `event` should reach the viewer on this device.
    fn routes(&self, _event: &InputEvent) -> bool {
        true
    }

    /// See an input event before the viewer handles it.
    fn observe(&mut self, _event: &InputEvent, _view: &ViewerView<'_>, _now: Instant) {}

    /// Run shell-local timers.
    fn tick(&mut self, _now: Instant) {}

    /// When [`tick`](Self::tick) next has work to do.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }
}

/// The image the view is showing.
fn current_image<'a>(view: &ViewerView<'a>) -> Result<&'a ImageRef, ShellError> {
    view.current().ok_or(ShellError::MissingImage {
        index: view.selected_index,
        len: view.images.len(),
    })
}

fn image_at<'a>(view: &ViewerView<'a>, index: usize) -> Result<&'a ImageRef, ShellError> {
    view.images.get(index).ok_or(ShellError::MissingImage {
        index,
        len: view.images.len(),
    })
}

/// Render transform of the current image, rejecting non-finite values.
fn checked_transform(transform: &TransformState) -> Result<RenderTransform, ShellError> {
    let render = transform.render_transform();
    let finite = [render.scale, render.translate_x, render.translate_y]
        .iter()
        .all(|v| v.is_finite());
    if finite && render.scale > 0.0 {
        Ok(render)
    } else {
        Err(ShellError::InvalidTransform(format!("{:?}", render)))
    }
}

/// Spinner or retry prompt for the current image, if it is not loaded.
fn status_element(view: &ViewerView<'_>) -> Option<Element> {
    match view.status {
        ImageStatus::Loading => Some(Element::Spinner),
        ImageStatus::Error(_) => Some(Element::RetryPrompt {
            index: view.selected_index,
        }),
        ImageStatus::Loaded => None,
    }
}

fn image_element(image: &ImageRef, transform: RenderTransform, offset_pct: f32) -> Element {
    Element::Image {
        url: image.url.clone(),
        alt: image.alt.clone(),
        transform,
        offset_pct,
    }
}

fn counter(view: &ViewerView<'_>) -> Element {
    Element::Counter {
        current: view.selected_index + 1,
        total: view.images.len(),
    }
}

fn thumbnails(view: &ViewerView<'_>) -> Vec<Thumbnail> {
    view.images
        .iter()
        .enumerate()
        .map(|(i, image)| Thumbnail {
            url: image.url.clone(),
            selected: i == view.selected_index,
        })
        .collect()
}

fn transition(view: &ViewerView<'_>) -> Option<Element> {
    let direction = view.slide.direction()?;
    let to = view.slide.next_index()?;
    Some(Element::Transition {
        direction,
        from: view.selected_index,
        to,
        duration_ms: crate::constants::SLIDE_DURATION_MS,
    })
}

/// Zoom, rotate and reset buttons with their enabled state.
fn transform_controls(view: &ViewerView<'_>) -> [Element; 4] {
    use vitrine_gesture::constants::{ZOOM_MAX, ZOOM_MIN};

    let interactive = view.phase != ViewerPhase::Navigating;
    let zoom = view.transform.zoom();
    let control = |control, enabled| Element::Control { control, enabled };
    [
        control(Control::ZoomOut, interactive && zoom > ZOOM_MIN),
        control(Control::ZoomIn, interactive && zoom < ZOOM_MAX),
        control(Control::Rotate, interactive),
        control(
            Control::Reset,
            interactive && view.transform != TransformState::identity(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::{ImageViewer, ViewerOptions};

    pub(crate) fn viewer_with(count: usize) -> ImageViewer {
        let images = (0..count)
            .map(|i| ImageRef::new(format!("img{}.png", i), format!("Image {}", i)))
            .collect();
        let mut viewer = ImageViewer::new(ViewerOptions::default());
        viewer
            .open(images, 0, Instant::now())
            .expect("open viewer");
        viewer
    }

    #[test]
    fn test_checked_transform_rejects_nan() {
        let ok = TransformState::identity();
        assert!(checked_transform(&ok).is_ok());

        let mut bad = TransformState::identity();
        bad.set_pan(vitrine_gesture::Point::new(f32::NAN, 0.0));
        assert!(matches!(
            checked_transform(&bad),
            Err(ShellError::InvalidTransform(_))
        ));
    }

    #[test]
    fn test_transform_controls_follow_zoom() {
        let mut viewer = viewer_with(2);
        let t0 = Instant::now();
        for _ in 0..10 {
            viewer
                .dispatch(crate::model::ViewerIntent::ZoomIn, t0)
                .unwrap();
        }
        let [zoom_out, zoom_in, _, reset] = transform_controls(&viewer.view());
        assert_eq!(
            zoom_in,
            Element::Control {
                control: Control::ZoomIn,
                enabled: false
            }
        );
        assert!(matches!(zoom_out, Element::Control { enabled: true, .. }));
        assert!(matches!(reset, Element::Control { enabled: true, .. }));
    }

    #[test]
    fn test_status_element() {
        let mut viewer = viewer_with(2);
        assert_eq!(status_element(&viewer.view()), Some(Element::Spinner));
        viewer.image_loaded(0).unwrap();
        assert_eq!(status_element(&viewer.view()), None);
        viewer.image_failed(0, "boom").unwrap();
        assert_eq!(
            status_element(&viewer.view()),
            Some(Element::RetryPrompt { index: 0 })
        );
    }
}
