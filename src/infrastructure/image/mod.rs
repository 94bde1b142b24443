//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with LRU eviction
//! - HTTP transport for sprite downloads
//! - Async image loading pipeline

pub mod http_transport;
pub mod loader;
pub mod memory_cache;

pub use http_transport::HttpImageTransport;
pub use loader::{ImageLoadedEvent, ImageLoader, ImageLoaderConfig};
pub use memory_cache::{CacheStats, DEFAULT_CACHE_SIZE, MemoryImageCache};
