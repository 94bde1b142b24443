//! Async image loading orchestrator.
//!
//! Resolves an item's image from the memory cache, falling back to the
//! network. Results of background loads are delivered over a channel so the
//! owning context applies them.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, trace, warn};

use crate::domain::entities::{ImageSource, Item, ItemId, LoadedImage};
use crate::domain::errors::FetchError;
use crate::domain::ports::{ImageCachePort, ImageTransportPort};

/// Message sent when a background load finishes.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// The item whose image was requested.
    pub id: ItemId,
    /// The loaded image, or `None` if download or decode failed.
    pub image: Option<LoadedImage>,
}

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Maximum concurrent background downloads.
    pub max_concurrent_downloads: usize,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 4,
        }
    }
}

#[derive(Debug)]
enum LoaderCommand {
    Load { item: Item },
}

/// Resolves item images through the shared cache.
pub struct ImageLoader {
    handle: ImageLoaderHandle,
    request_tx: mpsc::UnboundedSender<LoaderCommand>,
    config: ImageLoaderConfig,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// State for the background worker loop.
struct WorkerState {
    handle: ImageLoaderHandle,
    event_tx: mpsc::UnboundedSender<ImageLoadedEvent>,
    semaphore: Arc<Semaphore>,
    request_rx: mpsc::UnboundedReceiver<LoaderCommand>,
}

impl ImageLoader {
    /// Creates a loader and spawns its background worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        config: ImageLoaderConfig,
        cache: Arc<dyn ImageCachePort>,
        transport: Arc<dyn ImageTransportPort>,
        event_tx: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ) -> Self {
        let handle = ImageLoaderHandle { cache, transport };
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_downloads.max(1)));

        let worker_state = WorkerState {
            handle: handle.clone(),
            event_tx: event_tx.clone(),
            semaphore,
            request_rx,
        };

        tokio::spawn(Self::run_worker_loop(worker_state));

        Self {
            handle,
            request_tx,
            config,
        }
    }

    /// Worker loop to handle download requests and throttling.
    async fn run_worker_loop(mut state: WorkerState) {
        let mut queue: VecDeque<Item> = VecDeque::new();

        loop {
            tokio::select! {
                cmd = state.request_rx.recv() => {
                    match cmd {
                        Some(LoaderCommand::Load { item }) => {
                            if !queue.iter().any(|queued| queued.id() == item.id()) {
                                // Most recent request first.
                                queue.push_front(item);
                            }
                        }
                        None => break,
                    }
                }
                Ok(permit) = state.semaphore.clone().acquire_owned(), if !queue.is_empty() => {
                    if let Some(item) = queue.pop_front() {
                        let handle = state.handle.clone();
                        let event_tx = state.event_tx.clone();

                        tokio::spawn(async move {
                            let image = handle.resolve(&item).await;
                            let _ = event_tx.send(ImageLoadedEvent {
                                id: item.id(),
                                image,
                            });
                            drop(permit);
                        });
                    }
                }
            }
        }

        trace!(dropped = queue.len(), "Image loader worker stopped");
    }

    /// Resolves the image for `item`.
    ///
    /// A cache hit returns without touching the network. On a miss the image
    /// is downloaded, decoded and cached. Failures are logged and yield `None`.
    pub async fn resolve(&self, item: &Item) -> Option<LoadedImage> {
        self.handle.resolve(item).await
    }

    /// Returns the cached image for `id`, if any.
    #[must_use]
    pub fn cached(&self, id: ItemId) -> Option<Arc<image::DynamicImage>> {
        self.handle.cache.get(id)
    }

    /// Starts loading an image in the background.
    /// The result will be sent via the event channel.
    pub fn load_async(&self, item: Item) {
        if let Err(e) = self.request_tx.send(LoaderCommand::Load { item }) {
            error!("Failed to send load request: {}", e);
        }
    }

    /// Queues background loads for many items.
    pub fn prefetch<I>(&self, items: I)
    where
        I: IntoIterator<Item = Item>,
    {
        for item in items {
            self.load_async(item);
        }
    }
}

/// Shared dependencies for resolving one image.
#[derive(Clone)]
struct ImageLoaderHandle {
    cache: Arc<dyn ImageCachePort>,
    transport: Arc<dyn ImageTransportPort>,
}

impl ImageLoaderHandle {
    async fn resolve(&self, item: &Item) -> Option<LoadedImage> {
        let id = item.id();

        if let Some(image) = self.cache.get(id) {
            return Some(LoadedImage::new(id, image, ImageSource::MemoryCache));
        }

        let bytes = match self.transport.fetch_bytes(item.image_url()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(id = %id, url = %item.image_url(), error = %e, "Failed to download image");
                return None;
            }
        };

        let decoded = match decode(bytes).await {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(id = %id, error = %e, "Failed to decode image");
                return None;
            }
        };

        let image = Arc::new(decoded);
        self.cache.put(id, Arc::clone(&image));

        debug!(id = %id, source = "network", "Image loaded successfully");

        Some(LoadedImage::new(id, image, ImageSource::Network))
    }
}

async fn decode(bytes: Bytes) -> Result<image::DynamicImage, FetchError> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| FetchError::decode(format!("decode task panicked: {e}")))?
        .map_err(|e| FetchError::decode(e.to_string()))
}
