//! Neighbour preloading.
//!
//! The viewer asks a [`Preloader`] to fetch and decode the images next to the
//! one on screen, then polls it for results on every tick. Decoding is
//! fire-and-forget: nothing waits on a preload, and a failed one is only
//! logged because the image is requested again when the user navigates to it.

mod decoder_thread;
mod error;
mod source;
mod types;

pub use decoder_thread::DecoderThread;
pub use error::LoadError;
pub use source::{FileSource, ImageSource, decode_dimensions};
pub use types::{PreloadRequest, PreloadResult};

/// Something that can fetch and decode images off the viewer's event loop.
pub trait Preloader {
    /// Queue a request. Must not block.
    fn request(&mut self, request: PreloadRequest);

    /// Take one completed result, if any. Must not block.
    fn poll(&mut self) -> Option<PreloadResult>;

    /// Whether a request for `url` issued in session `generation` is still
    /// in flight. Requests from other sessions do not count.
    fn is_pending(&self, generation: u64, url: &str) -> bool;

    /// Number of requests still in flight.
    fn pending_count(&self) -> usize;
}
