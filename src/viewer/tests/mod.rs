//! Scenario tests for the image viewer.
//!
//! These drive [`ImageViewer`](super::ImageViewer) through an explicit clock,
//! so slide commits and preload debounces fire exactly when `tick` is called
//! past their deadline.

mod support;
