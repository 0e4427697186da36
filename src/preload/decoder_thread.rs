//! Background thread for image preloading (native only)
//!
//! [`DecoderThread`] owns a named worker thread that fetches an image through
//! an [`ImageSource`], decodes it fully, and reports the outcome over a
//! channel. The viewer drains results with [`Preloader::poll`] on its own
//! tick, so nothing on the event loop ever blocks on a decode.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use super::{ImageSource, LoadError, PreloadRequest, PreloadResult, Preloader, decode_dimensions};

/// Message sent to the decoder thread.
enum ThreadMessage {
    /// Fetch and decode an image
    Decode(PreloadRequest),
    /// Shutdown the thread
    Shutdown,
}

/// Manages a background thread for image preloading.
pub struct DecoderThread {
    /// Sender for requests to the background thread
    request_tx: Sender<ThreadMessage>,
    /// Receiver for results from the background thread
    result_rx: Receiver<PreloadResult>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
    /// In-flight request count per session generation and URL
    pending: HashMap<(u64, String), usize>,
}

impl DecoderThread {
    /// Spawn a new decoder thread reading through `source`.
    pub fn spawn(source: Arc<dyn ImageSource>) -> Result<Self, LoadError> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<PreloadResult>();

        let thread_handle = thread::Builder::new()
            .name("image-preloader".to_string())
            .spawn(move || {
                log::info!("Image preloader thread started ({} source)", source.id());
                Self::thread_loop(source.as_ref(), request_rx, result_tx);
                log::info!("Image preloader thread exiting");
            })
            .map_err(|e| LoadError::Unavailable(format!("failed to spawn thread: {}", e)))?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            pending: HashMap::new(),
        })
    }

    /// Background thread main loop.
    fn thread_loop(
        source: &dyn ImageSource,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<PreloadResult>,
    ) {
        while let Ok(message) = request_rx.recv() {
            match message {
                ThreadMessage::Decode(request) => {
                    let result = Self::load(source, request);
                    if result_tx.send(result).is_err() {
                        log::warn!("Result channel closed, preloader thread exiting");
                        break;
                    }
                }
                ThreadMessage::Shutdown => {
                    log::debug!("Received shutdown signal");
                    break;
                }
            }
        }
    }

    /// Fetch and decode one image.
    fn load(source: &dyn ImageSource, request: PreloadRequest) -> PreloadResult {
        let PreloadRequest { generation, url } = request;
        let outcome = source
            .fetch(&url)
            .and_then(|bytes| decode_dimensions(&bytes));

        match outcome {
            Ok((width, height)) => {
                log::debug!("Preloaded {}: {}x{}", url, width, height);
                PreloadResult::Loaded {
                    generation,
                    url,
                    width,
                    height,
                }
            }
            Err(e) => PreloadResult::Failed {
                generation,
                url,
                error: e.to_string(),
            },
        }
    }

    fn mark_done(&mut self, generation: u64, url: &str) {
        let key = (generation, url.to_string());
        if let Some(count) = self.pending.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&key);
            }
        }
    }
}

impl Preloader for DecoderThread {
    fn request(&mut self, request: PreloadRequest) {
        let key = (request.generation, request.url.clone());
        if self
            .request_tx
            .send(ThreadMessage::Decode(request))
            .is_err()
        {
            log::error!(
                "Failed to send preload request for {}: channel closed",
                key.1
            );
            return;
        }
        *self.pending.entry(key).or_insert(0) += 1;
    }

    fn poll(&mut self) -> Option<PreloadResult> {
        match self.result_rx.try_recv() {
            Ok(result) => {
                self.mark_done(result.generation(), result.url());
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Preloader thread disconnected");
                None
            }
        }
    }

    fn is_pending(&self, generation: u64, url: &str) -> bool {
        self.pending.contains_key(&(generation, url.to_string()))
    }

    fn pending_count(&self) -> usize {
        self.pending.values().sum()
    }
}

impl Drop for DecoderThread {
    fn drop(&mut self) {
        log::debug!("Shutting down preloader thread");

        // Send shutdown signal
        let _ = self.request_tx.send(ThreadMessage::Shutdown);

        // Wait for thread to finish
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Preloader thread panicked: {:?}", e);
            }
        }
    }
}
