//! Port definition for image caching.

use std::sync::Arc;

use crate::domain::entities::ItemId;

/// Port for the shared decoded-image cache.
/// Implementations must be thread-safe and must not block on I/O.
pub trait ImageCachePort: Send + Sync {
    /// Returns the cached image, or `None` if absent.
    fn get(&self, id: ItemId) -> Option<Arc<image::DynamicImage>>;

    /// Stores an image, overwriting any previous entry for `id`.
    /// May evict other entries to stay within capacity, never `id` itself.
    fn put(&self, id: ItemId, image: Arc<image::DynamicImage>);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
