//! Shared helpers for viewer scenario tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use crate::model::ImageRef;
use crate::preload::{PreloadRequest, PreloadResult, Preloader};
use crate::viewer::{ImageViewer, ViewerOptions};

pub fn ms(base: Instant, millis: u64) -> Instant {
    base + Duration::from_millis(millis)
}

pub fn gallery(count: usize) -> Vec<ImageRef> {
    (0..count)
        .map(|i| ImageRef::new(format!("img{}.png", i), format!("Image {}", i)))
        .collect()
}

/// Records requests and hands back results queued by the test.
#[derive(Debug, Default)]
pub struct FakeState {
    pub requests: Vec<PreloadRequest>,
    pub results: VecDeque<PreloadResult>,
}

impl FakeState {
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.url.clone()).collect()
    }

    /// Complete every outstanding request successfully.
    pub fn complete_all(&mut self) {
        for request in self.requests.drain(..) {
            self.results.push_back(PreloadResult::Loaded {
                generation: request.generation,
                url: request.url,
                width: 10,
                height: 10,
            });
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePreloader {
    pub state: Rc<RefCell<FakeState>>,
}

impl Preloader for FakePreloader {
    fn request(&mut self, request: PreloadRequest) {
        self.state.borrow_mut().requests.push(request);
    }

    fn poll(&mut self) -> Option<PreloadResult> {
        self.state.borrow_mut().results.pop_front()
    }

    fn is_pending(&self, generation: u64, url: &str) -> bool {
        self.state
            .borrow()
            .requests
            .iter()
            .any(|r| r.generation == generation && r.url == url)
    }

    fn pending_count(&self) -> usize {
        self.state.borrow().requests.len()
    }
}

/// Callback invocations observed during a test.
#[derive(Debug, Default)]
pub struct Calls {
    pub open_changes: Vec<bool>,
    pub image_changes: Vec<usize>,
}

pub struct Harness {
    pub viewer: ImageViewer,
    pub preloads: Rc<RefCell<FakeState>>,
    pub calls: Rc<RefCell<Calls>>,
}

/// A closed viewer with preloading enabled and both callbacks recorded.
pub fn harness() -> Harness {
    let preloader = FakePreloader::default();
    let preloads = preloader.state.clone();
    let calls = Rc::new(RefCell::new(Calls::default()));

    let open_calls = calls.clone();
    let image_calls = calls.clone();
    let viewer = ImageViewer::new(ViewerOptions::default())
        .with_preloader(Box::new(preloader))
        .on_open_change(move |open| open_calls.borrow_mut().open_changes.push(open))
        .on_image_change(move |index| image_calls.borrow_mut().image_changes.push(index));

    Harness {
        viewer,
        preloads,
        calls,
    }
}

/// A harness already opened on `count` images at `selected`.
pub fn opened(count: usize, selected: usize, now: Instant) -> Harness {
    let mut h = harness();
    h.viewer
        .open(gallery(count), selected, now)
        .expect("open viewer");
    h
}
