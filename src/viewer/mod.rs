//! The image viewer modal.
//!
//! [`ImageViewer`] owns everything that lives only while the modal is open:
//! the selected index, the transform of the displayed image, the slide
//! transition, the set of preloaded URLs and the per-image load status. It
//! holds no reference to products or cart items; callers hand it a list of
//! [`ImageRef`]s and receive `on_open_change` / `on_image_change` callbacks.
//!
//! ## Lifecycle
//!
//! ```text
//! Closed ──open──▶ Loading ──image_loaded──▶ Ready ◀──▶ zoom/pan/rotate
//!                     ▲                        │
//!                     └──── commit (300 ms) ◀── Navigating ◀── go_to
//!  any state ──close──▶ Closed  (tasks cancelled, caches cleared)
//! ```
//!
//! Deferred work is queued on a [`Scheduler`] and run from [`ImageViewer::tick`].
//! Closing cancels every queued task and bumps the session generation, so
//! neither a pending slide commit nor a late preload result can touch a closed
//! or reopened viewer.

mod error;
mod listeners;
mod navigation;
mod status;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::time::Duration;

use vitrine_gesture::{
    GestureAction, GestureConfig, GestureContext, GestureInterpreter, InputEvent, Rectangle,
    TransformState,
};
use web_time::Instant;

use crate::config::AppConfig;
use crate::constants::{PRELOAD_DEBOUNCE_MS, SLIDE_DURATION_MS};
use crate::keybindings::KeyBindings;
use crate::model::{ImageRef, ImageStatus, SlideDirection, ViewerIntent};
use crate::preload::{PreloadRequest, PreloadResult, Preloader};
use crate::scheduler::{Scheduler, TaskHandle};

pub use error::ViewerError;
pub use listeners::InputListeners;
pub use navigation::{SlideState, neighbours, next_index, previous_index};
pub use status::ImageStatusStore;

/// Where the viewer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerPhase {
    Closed,
    /// Open, current image not yet loaded
    Loading,
    /// Open, current image displayed
    Ready,
    /// Current image failed to load; a retry is offered
    Failed,
    /// Slide transition in progress
    Navigating,
}

/// Behaviour switches taken from the application config.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Fetch the neighbours of the current image in the background
    pub preload: bool,
    pub gesture: GestureConfig,
    pub keybindings: KeyBindings,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            preload: true,
            gesture: GestureConfig::default(),
            keybindings: KeyBindings::default(),
        }
    }
}

impl From<&AppConfig> for ViewerOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            preload: config.preferences.preload,
            gesture: config.gesture,
            keybindings: config.keybindings.clone(),
        }
    }
}

/// Work deferred through the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewerTask {
    CommitSlide { index: usize },
    Preload { index: usize },
}

/// Read-only snapshot handed to presentation shells.
#[derive(Debug, Clone, Copy)]
pub struct ViewerView<'a> {
    pub open: bool,
    pub images: &'a [ImageRef],
    pub selected_index: usize,
    pub transform: TransformState,
    pub slide: SlideState,
    pub phase: ViewerPhase,
    pub status: &'a ImageStatus,
    pub container: Rectangle,
}

impl<'a> ViewerView<'a> {
    /// The image currently on screen.
    pub fn current(&self) -> Option<&'a ImageRef> {
        self.images.get(self.selected_index)
    }
}

type OpenChangeCallback = Box<dyn FnMut(bool)>;
type ImageChangeCallback = Box<dyn FnMut(usize)>;

/// A modal image viewer with zoom, pan, rotation and navigation.
pub struct ImageViewer {
    options: ViewerOptions,
    images: Vec<ImageRef>,
    open: bool,
    /// Bumped on every open and close; tags preload requests
    generation: u64,
    selected_index: usize,
    transform: TransformState,
    slide: SlideState,
    preloaded: HashSet<String>,
    status: ImageStatusStore,
    listeners: InputListeners,
    gestures: GestureInterpreter,
    scheduler: Scheduler<ViewerTask>,
    preload_task: Option<TaskHandle>,
    preloader: Option<Box<dyn Preloader>>,
    container: Rectangle,
    on_open_change: Option<OpenChangeCallback>,
    on_image_change: Option<ImageChangeCallback>,
}

impl ImageViewer {
    /// Create a closed viewer.
    pub fn new(options: ViewerOptions) -> Self {
        let gestures = GestureInterpreter::new(options.gesture);
        Self {
            options,
            images: Vec::new(),
            open: false,
            generation: 0,
            selected_index: 0,
            transform: TransformState::identity(),
            slide: SlideState::Idle,
            preloaded: HashSet::new(),
            status: ImageStatusStore::default(),
            listeners: InputListeners::default(),
            gestures,
            scheduler: Scheduler::new(),
            preload_task: None,
            preloader: None,
            container: Rectangle::default(),
            on_open_change: None,
            on_image_change: None,
        }
    }

    /// Use `preloader` to fetch neighbouring images.
    pub fn with_preloader(mut self, preloader: Box<dyn Preloader>) -> Self {
        self.preloader = Some(preloader);
        self
    }

    /// Set the callback fired whenever the open state changes.
    pub fn on_open_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(bool) + 'static,
    {
        self.on_open_change = Some(Box::new(f));
        self
    }

    /// Set the callback fired when a navigation commits.
    pub fn on_image_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize) + 'static,
    {
        self.on_image_change = Some(Box::new(f));
        self
    }

    /// Set the screen-space bounds of the image container.
    pub fn set_container(&mut self, container: Rectangle) {
        self.container = container;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn current_image(&self) -> Option<&ImageRef> {
        self.images.get(self.selected_index)
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn slide(&self) -> SlideState {
        self.slide
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_sliding()
    }

    /// URLs confirmed loaded by the preloader during this session.
    pub fn preloaded(&self) -> &HashSet<String> {
        &self.preloaded
    }

    pub fn listeners(&self) -> &InputListeners {
        &self.listeners
    }

    pub fn status(&self, index: usize) -> &ImageStatus {
        self.status.get(index)
    }

    pub fn phase(&self) -> ViewerPhase {
        if !self.open {
            ViewerPhase::Closed
        } else if self.slide.is_sliding() {
            ViewerPhase::Navigating
        } else {
            match self.status.get(self.selected_index) {
                ImageStatus::Loading => ViewerPhase::Loading,
                ImageStatus::Loaded => ViewerPhase::Ready,
                ImageStatus::Error(_) => ViewerPhase::Failed,
            }
        }
    }

    /// When the next scheduled task is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    /// Number of preload requests still in flight.
    pub fn pending_preloads(&self) -> usize {
        self.preloader.as_ref().map_or(0, |p| p.pending_count())
    }

    pub fn view(&self) -> ViewerView<'_> {
        ViewerView {
            open: self.open,
            images: &self.images,
            selected_index: self.selected_index,
            transform: self.transform,
            slide: self.slide,
            phase: self.phase(),
            status: self.status.get(self.selected_index),
            container: self.container,
        }
    }

    // =========================================================================
    // Open / Close
    // =========================================================================

    /// Open the viewer on `images` at `selected_index`.
    ///
    /// Opening an already open viewer starts a fresh session with the new list.
    pub fn open(
        &mut self,
        images: Vec<ImageRef>,
        selected_index: usize,
        now: Instant,
    ) -> Result<(), ViewerError> {
        if images.is_empty() {
            return Err(ViewerError::EmptyGallery);
        }
        if selected_index >= images.len() {
            return Err(ViewerError::IndexOutOfRange {
                index: selected_index,
                len: images.len(),
            });
        }

        let was_open = self.open;
        self.reset_session();
        self.images = images;
        self.selected_index = selected_index;
        self.open = true;
        self.listeners.register();
        self.status.set(selected_index, ImageStatus::Loading);
        self.schedule_preload(selected_index, now);

        log::info!(
            "Viewer opened with {} images at index {}",
            self.images.len(),
            selected_index
        );
        if !was_open {
            self.emit_open_change(true);
        }
        Ok(())
    }

    /// Close the viewer. Pending transitions and preloads are cancelled and
    /// the preload cache is dropped. The image list and selected index are
    /// kept so [`set_open`](Self::set_open) can reopen where the user left.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.reset_session();
        self.open = false;
        log::info!("Viewer closed");
        self.emit_open_change(false);
    }

    /// Mirror an externally controlled `open` flag.
    pub fn set_open(&mut self, open: bool, now: Instant) -> Result<(), ViewerError> {
        match (open, self.open) {
            (true, false) => {
                let images = std::mem::take(&mut self.images);
                let selected = self.selected_index;
                self.open(images, selected, now)
            }
            (false, true) => {
                self.close();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Drop all transient state of the current session.
    fn reset_session(&mut self) {
        self.generation += 1;
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            log::debug!("Cancelled {} pending viewer tasks", cancelled);
        }
        self.preload_task = None;
        self.slide = SlideState::Idle;
        self.preloaded.clear();
        self.status.clear();
        self.listeners.deregister();
        self.gestures.cancel();
        self.transform.reset();
    }

    fn emit_open_change(&mut self, open: bool) {
        if let Some(callback) = self.on_open_change.as_mut() {
            callback(open);
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Start a slide transition to `index`.
    ///
    /// Returns `Ok(false)` without changing anything if a transition is
    /// already running or `index` is the current image. Without an explicit
    /// `direction`, moving forward slides left and moving back slides right.
    pub fn go_to(
        &mut self,
        index: usize,
        direction: Option<SlideDirection>,
        now: Instant,
    ) -> Result<bool, ViewerError> {
        if !self.open {
            return Err(ViewerError::Closed);
        }
        if index >= self.images.len() {
            return Err(ViewerError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        let direction =
            direction.unwrap_or_else(|| SlideDirection::between(self.selected_index, index));
        Ok(self.begin_slide(index, direction, now))
    }

    /// Navigate to the next image, wrapping around.
    pub fn next(&mut self, now: Instant) -> bool {
        let target = next_index(self.selected_index, self.images.len());
        self.open && self.begin_slide(target, SlideDirection::Left, now)
    }

    /// Navigate to the previous image, wrapping around.
    pub fn previous(&mut self, now: Instant) -> bool {
        let target = previous_index(self.selected_index, self.images.len());
        self.open && self.begin_slide(target, SlideDirection::Right, now)
    }

    fn begin_slide(&mut self, index: usize, direction: SlideDirection, now: Instant) -> bool {
        if self.slide.is_sliding() {
            log::debug!("Ignoring navigation to {}: transition in progress", index);
            return false;
        }
        if index == self.selected_index {
            return false;
        }

        self.transform.reset_view();
        self.gestures.cancel();
        let commit = self.scheduler.schedule(
            now,
            Duration::from_millis(SLIDE_DURATION_MS),
            ViewerTask::CommitSlide { index },
        );
        self.slide = SlideState::Sliding {
            direction,
            next_index: index,
            commit,
        };
        log::debug!(
            "Sliding {:?} from {} to {}",
            direction,
            self.selected_index,
            index
        );
        true
    }

    fn commit_slide(&mut self, index: usize, now: Instant) {
        self.slide = SlideState::Idle;
        self.selected_index = index;

        let status = if self.preloaded.contains(&self.images[index].url) {
            ImageStatus::Loaded
        } else {
            ImageStatus::Loading
        };
        self.status.set(index, status);
        self.schedule_preload(index, now);

        if let Some(callback) = self.on_image_change.as_mut() {
            callback(index);
        }
    }

    // =========================================================================
    // Scheduled work
    // =========================================================================

    /// Run due tasks and collect finished preloads.
    pub fn tick(&mut self, now: Instant) {
        for task in self.scheduler.take_due(now) {
            self.run_task(task, now);
        }
        self.drain_preloads();
    }

    fn run_task(&mut self, task: ViewerTask, now: Instant) {
        if !self.open {
            log::debug!("Dropping {:?}: viewer closed", task);
            return;
        }
        match task {
            ViewerTask::CommitSlide { index } => self.commit_slide(index, now),
            ViewerTask::Preload { index } => {
                self.preload_task = None;
                self.preload_neighbours(index);
            }
        }
    }

    /// Debounce neighbour preloading after an index change.
    fn schedule_preload(&mut self, index: usize, now: Instant) {
        if !self.options.preload || self.preloader.is_none() {
            return;
        }
        if let Some(previous) = self.preload_task.take() {
            self.scheduler.cancel(previous);
        }
        self.preload_task = Some(self.scheduler.schedule(
            now,
            Duration::from_millis(PRELOAD_DEBOUNCE_MS),
            ViewerTask::Preload { index },
        ));
    }

    fn preload_neighbours(&mut self, index: usize) {
        let Some(preloader) = self.preloader.as_mut() else {
            return;
        };
        for neighbour in neighbours(index, self.images.len()) {
            let url = &self.images[neighbour].url;
            if self.preloaded.contains(url) || preloader.is_pending(self.generation, url) {
                continue;
            }
            log::debug!("Preloading image {} ({})", neighbour, url);
            preloader.request(PreloadRequest {
                generation: self.generation,
                url: url.clone(),
            });
        }
    }

    fn drain_preloads(&mut self) {
        let Some(preloader) = self.preloader.as_mut() else {
            return;
        };
        while let Some(result) = preloader.poll() {
            if !self.open || result.generation() != self.generation {
                log::debug!("Discarding stale preload result for {}", result.url());
                continue;
            }
            match result {
                PreloadResult::Loaded { url, .. } => {
                    self.preloaded.insert(url);
                }
                PreloadResult::Failed { url, error, .. } => {
                    log::warn!("Failed to preload {}: {}", url, error);
                }
            }
        }
    }

    // =========================================================================
    // Image load status
    // =========================================================================

    fn check_index(&self, index: usize) -> Result<(), ViewerError> {
        if !self.open {
            Err(ViewerError::Closed)
        } else if index >= self.images.len() {
            Err(ViewerError::IndexOutOfRange {
                index,
                len: self.images.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Report that the image at `index` finished loading.
    pub fn image_loaded(&mut self, index: usize) -> Result<(), ViewerError> {
        self.check_index(index)?;
        self.status.set(index, ImageStatus::Loaded);
        Ok(())
    }

    /// Report that the image at `index` failed to load.
    pub fn image_failed(
        &mut self,
        index: usize,
        reason: impl Into<String>,
    ) -> Result<(), ViewerError> {
        self.check_index(index)?;
        let reason = reason.into();
        log::warn!("Image {} failed to load: {}", index, reason);
        self.status.set(index, ImageStatus::Error(reason));
        Ok(())
    }

    /// Mark the image at `index` as loading again and return the URL the host
    /// should re-request. There is no retry limit; this is user-triggered.
    pub fn retry(&mut self, index: usize) -> Result<&str, ViewerError> {
        self.check_index(index)?;
        self.status.set(index, ImageStatus::Loading);
        log::info!("Retrying image {}", index);
        Ok(&self.images[index].url)
    }

    // =========================================================================
    // Intents and input
    // =========================================================================

    /// Apply a user intent. Returns whether anything changed.
    pub fn dispatch(&mut self, intent: ViewerIntent, now: Instant) -> Result<bool, ViewerError> {
        if !self.open {
            return Err(ViewerError::Closed);
        }
        let before = self.transform;
        match intent {
            ViewerIntent::ZoomIn
            | ViewerIntent::ZoomOut
            | ViewerIntent::Rotate
            | ViewerIntent::Reset
                if self.slide.is_sliding() =>
            {
                log::trace!("Ignoring {} during transition", intent.name());
                return Ok(false);
            }
            ViewerIntent::Close => {
                self.close();
                return Ok(true);
            }
            ViewerIntent::Next => return Ok(self.next(now)),
            ViewerIntent::Previous => return Ok(self.previous(now)),
            ViewerIntent::GoTo(index) => return self.go_to(index, None, now),
            ViewerIntent::Retry => {
                let index = self.selected_index;
                return self.retry(index).map(|_| true);
            }
            ViewerIntent::ZoomIn => self.transform.zoom_in(),
            ViewerIntent::ZoomOut => self.transform.zoom_out(),
            ViewerIntent::Rotate => self.transform.rotate(),
            ViewerIntent::Reset => self.transform.reset(),
        }
        Ok(self.transform != before)
    }

    /// Route a raw input event. Returns whether it changed the viewer.
    ///
    /// Events are ignored while the matching listener is not registered,
    /// which is always the case when the viewer is closed.
    pub fn handle_input(&mut self, event: &InputEvent, now: Instant) -> bool {
        if !self.listeners.accepts(event) {
            log::trace!("Ignoring input while closed: {:?}", event);
            return false;
        }

        if let InputEvent::KeyPressed { key } = event {
            let Some(intent) = self.options.keybindings.intent_for_key(*key) else {
                return false;
            };
            return match self.dispatch(intent, now) {
                Ok(changed) => changed,
                Err(e) => {
                    log::warn!("{} failed: {}", intent.name(), e);
                    false
                }
            };
        }

        let ctx = GestureContext {
            zoom: self.transform.zoom(),
            pan: self.transform.pan(),
            container: self.container,
        };
        let Some(action) = self.gestures.handle(event, &ctx) else {
            return false;
        };

        match action {
            GestureAction::Swipe(swipe) => match SlideDirection::from(swipe) {
                SlideDirection::Left => self.next(now),
                SlideDirection::Right => self.previous(now),
            },
            _ if self.slide.is_sliding() => {
                log::trace!("Ignoring {:?} during transition", action);
                false
            }
            _ => self.transform.apply(&action),
        }
    }
}
