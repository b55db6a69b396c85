//! Asynchronous page content loading.
//!
//! A single worker thread pulls pages from a host-supplied [`PageProvider`]
//! and hands results back to the render-affecting thread through a message
//! queue drained by [`PageTexturesManager::poll_events`]. At most one load is
//! in flight per page index, loaded bitmaps are kept in a small LRU cache,
//! and pending loads are discarded on teardown.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use ahash::{HashSet, HashSetExt};
use lru::LruCache;
use thiserror::Error;
use tracing::{debug, warn};

use crate::page::PageBitmap;

// The original keeps the four most recently shown pages decoded.
const CACHE_CAPACITY: usize = 4;

/// A page content load failure, carrying the provider's underlying error.
#[derive(Debug, Error)]
#[error("failed to load page {index}")]
pub struct PageLoadError {
    pub index: usize,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Supplies decoded page content. Implemented by the host; called only from
/// the manager's worker thread.
pub trait PageProvider: Send + 'static {
    /// Total number of pages available.
    fn page_count(&self) -> usize;

    /// Loads and decodes the page at `index`, sized for a `size` pixel page
    /// rectangle.
    fn load_page(
        &mut self,
        index: usize,
        size: (u32, u32),
    ) -> Result<PageBitmap, Box<dyn std::error::Error + Send + Sync>>;
}

/// Load lifecycle notifications, in the order the worker produced them.
#[derive(Debug)]
pub enum LoadEvent {
    Started { index: usize },
    Completed { index: usize, bitmap: PageBitmap },
    Failed(PageLoadError),
}

enum WorkerCommand {
    Load { index: usize, size: (u32, u32) },
    Shutdown,
}

/// Schedules page loads and delivers the results back to the caller thread.
///
/// The caller is expected to be the render-affecting thread: call
/// [`request_page`](PageTexturesManager::request_page) when a mesh slot needs
/// content, then drain [`poll_events`](PageTexturesManager::poll_events) once
/// per frame and feed completed bitmaps into the right
/// [`crate::TexturePage`]. A load error is logged and surfaced as
/// [`LoadEvent::Failed`]; the page keeps its solid blend color until content
/// arrives.
pub struct PageTexturesManager {
    commands: Sender<WorkerCommand>,
    events: Receiver<LoadEvent>,
    in_flight: Arc<Mutex<HashSet<usize>>>,
    closing: Arc<AtomicBool>,
    cache: LruCache<usize, PageBitmap>,
    page_count: usize,
    worker: Option<JoinHandle<()>>,
}

impl PageTexturesManager {
    /// Spawns the worker thread around the provider.
    pub fn new<P: PageProvider>(mut provider: P) -> Self {
        let page_count = provider.page_count();
        let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>();
        let (event_tx, event_rx) = mpsc::channel::<LoadEvent>();
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let closing = Arc::new(AtomicBool::new(false));

        let worker_in_flight = Arc::clone(&in_flight);
        let worker_closing = Arc::clone(&closing);
        let worker = thread::Builder::new()
            .name("folio-page-loader".into())
            .spawn(move || {
                worker_loop(
                    &mut provider,
                    command_rx,
                    event_tx,
                    worker_in_flight,
                    worker_closing,
                )
            })
            .expect("failed to spawn page loader thread");

        Self {
            commands: command_tx,
            events: event_rx,
            in_flight,
            closing,
            cache: LruCache::new(NonZeroUsize::new(CACHE_CAPACITY).expect("nonzero capacity")),
            page_count,
            worker: Some(worker),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Requests content for a page. Returns the bitmap right away on a cache
    /// hit; otherwise schedules a load unless one is already in flight for
    /// this index.
    pub fn request_page(&mut self, index: usize, size: (u32, u32)) -> Option<PageBitmap> {
        if let Some(bitmap) = self.cache.get(&index) {
            return Some(bitmap.clone());
        }

        let mut in_flight = self.in_flight.lock().expect("in-flight set poisoned");
        if in_flight.insert(index) {
            debug!(index, ?size, "scheduling page load");
            // A send failure means the worker is gone; the closing flag makes
            // that a no-op rather than an error.
            let _ = self.commands.send(WorkerCommand::Load { index, size });
        }
        None
    }

    /// Drains load notifications produced since the last call, feeding
    /// completed bitmaps into the cache.
    pub fn poll_events(&mut self) -> Vec<LoadEvent> {
        let events: Vec<LoadEvent> = self.events.try_iter().collect();
        for event in &events {
            if let LoadEvent::Completed { index, bitmap } = event {
                self.cache.put(*index, bitmap.clone());
            }
        }
        events
    }

    /// Discards pending loads and joins the worker thread.
    pub fn close(&mut self) {
        self.closing.store(true, Ordering::SeqCst);
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for PageTexturesManager {
    fn drop(&mut self) {
        self.close();
    }
}

fn worker_loop<P: PageProvider>(
    provider: &mut P,
    commands: Receiver<WorkerCommand>,
    events: Sender<LoadEvent>,
    in_flight: Arc<Mutex<HashSet<usize>>>,
    closing: Arc<AtomicBool>,
) {
    while let Ok(command) = commands.recv() {
        match command {
            WorkerCommand::Load { index, size } => {
                // Teardown discards anything still queued.
                if closing.load(Ordering::SeqCst) {
                    continue;
                }

                let _ = events.send(LoadEvent::Started { index });
                let result = provider.load_page(index, size);

                in_flight
                    .lock()
                    .expect("in-flight set poisoned")
                    .remove(&index);

                match result {
                    Ok(bitmap) => {
                        debug!(index, "page load completed");
                        let _ = events.send(LoadEvent::Completed { index, bitmap });
                    }
                    Err(source) => {
                        let error = PageLoadError { index, source };
                        warn!(index, %error, "page load failed");
                        let _ = events.send(LoadEvent::Failed(error));
                    }
                }
            }
            WorkerCommand::Shutdown => break,
        }
    }
}
