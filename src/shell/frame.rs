//! Platform-neutral display list produced by the shells.
//!
//! A [`Frame`] is what a shell wants on screen for one render pass. Hosts
//! translate it into their own widgets; the native driver simply prints it.

use std::fmt;

use vitrine_gesture::RenderTransform;

use crate::config::ThumbnailOrientation;
use crate::model::{SlideDirection, ViewerIntent};

/// A clickable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    Rotate,
    Reset,
    Previous,
    Next,
    Close,
    Retry,
    /// Error-boundary recovery; handled by the host, not the viewer
    Reload,
}

impl Control {
    /// The viewer intent this control dispatches, if any.
    pub fn intent(&self) -> Option<ViewerIntent> {
        match self {
            Control::ZoomIn => Some(ViewerIntent::ZoomIn),
            Control::ZoomOut => Some(ViewerIntent::ZoomOut),
            Control::Rotate => Some(ViewerIntent::Rotate),
            Control::Reset => Some(ViewerIntent::Reset),
            Control::Previous => Some(ViewerIntent::Previous),
            Control::Next => Some(ViewerIntent::Next),
            Control::Close => Some(ViewerIntent::Close),
            Control::Retry => Some(ViewerIntent::Retry),
            Control::Reload => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Control::ZoomIn => "+",
            Control::ZoomOut => "-",
            Control::Rotate => "rotate",
            Control::Reset => "reset",
            Control::Previous => "<",
            Control::Next => ">",
            Control::Close => "x",
            Control::Retry => "retry",
            Control::Reload => "reload",
        }
    }
}

/// One entry of a thumbnail strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub selected: bool,
}

/// Something to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// An image; `offset_pct` is its horizontal offset in viewport widths
    Image {
        url: String,
        alt: String,
        transform: RenderTransform,
        offset_pct: f32,
    },
    /// Loading indicator over the current image
    Spinner,
    /// Load failure with a retry affordance
    RetryPrompt { index: usize },
    Control { control: Control, enabled: bool },
    /// One-based position, `current / total`
    Counter { current: usize, total: usize },
    ThumbnailStrip {
        orientation: ThumbnailOrientation,
        items: Vec<Thumbnail>,
        visible: bool,
    },
    /// Magnified lens following the cursor; origin in percent of the image
    HoverLens {
        url: String,
        origin_x_pct: f32,
        origin_y_pct: f32,
        scale: f32,
    },
    /// Slide animation between two images
    Transition {
        direction: SlideDirection,
        from: usize,
        to: usize,
        duration_ms: u64,
    },
    /// Error-boundary fallback dialog
    Fallback { message: String },
}

/// A complete render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub elements: Vec<Element>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Controls present in this frame, with their enabled flag.
    pub fn controls(&self) -> impl Iterator<Item = (Control, bool)> + '_ {
        self.elements.iter().filter_map(|e| match e {
            Element::Control { control, enabled } => Some((*control, *enabled)),
            _ => None,
        })
    }

    /// Whether `control` is present and enabled.
    pub fn is_enabled(&self, control: Control) -> bool {
        self.controls().any(|(c, enabled)| c == control && enabled)
    }

    pub fn has_fallback(&self) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, Element::Fallback { .. }))
    }
}

impl Extend<Element> for Frame {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Image {
                url,
                alt,
                transform,
                offset_pct,
            } => write!(
                f,
                "image {} \"{}\" [{}] at {}%",
                url,
                alt,
                transform.to_css(),
                offset_pct
            ),
            Element::Spinner => write!(f, "loading..."),
            Element::RetryPrompt { index } => {
                write!(f, "image {} failed to load [retry]", index + 1)
            }
            Element::Control { control, enabled } => {
                if *enabled {
                    write!(f, "[{}]", control.label())
                } else {
                    write!(f, "({})", control.label())
                }
            }
            Element::Counter { current, total } => write!(f, "{} / {}", current, total),
            Element::ThumbnailStrip {
                orientation,
                items,
                visible,
            } => {
                let marks: String = items
                    .iter()
                    .map(|t| if t.selected { '#' } else { '.' })
                    .collect();
                let state = if *visible { "" } else { " (hidden)" };
                write!(f, "thumbnails {:?} {}{}", orientation, marks, state)
            }
            Element::HoverLens {
                url,
                origin_x_pct,
                origin_y_pct,
                scale,
            } => write!(
                f,
                "lens {} x{} at {:.1}% {:.1}%",
                url, scale, origin_x_pct, origin_y_pct
            ),
            Element::Transition {
                direction,
                from,
                to,
                duration_ms,
            } => write!(
                f,
                "slide {:?} {} -> {} ({} ms)",
                direction,
                from + 1,
                to + 1,
                duration_ms
            ),
            Element::Fallback { message } => write!(f, "viewer crashed: {}", message),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            writeln!(f, "{}", element)?;
        }
        Ok(())
    }
}
