//! Vitrine - product image viewer
//!
//! A modal image viewer for storefront product galleries: zoom, pan, rotate,
//! swipe and keyboard navigation with neighbour preloading, rendered through
//! device-specific shells behind an error boundary. Gesture interpretation and
//! the transform math live in the platform-independent `vitrine_gesture` crate.

pub mod config;
pub mod constants;
pub mod keybindings;
pub mod logging;
pub mod model;
pub mod preload;
pub mod scheduler;
pub mod shell;
pub mod viewer;

pub use config::AppConfig;
pub use model::{ImageRef, ImageStatus, SlideDirection, ViewerIntent};
pub use shell::{Frame, UnifiedShell, ViewerShell};
pub use viewer::{ImageViewer, ViewerError, ViewerOptions, ViewerPhase, ViewerView};

pub use vitrine_gesture as gesture;
