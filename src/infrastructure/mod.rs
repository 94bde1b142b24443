//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (caching, transport, loading).
pub mod image;
/// PokeAPI catalog client.
pub mod pokeapi;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use image::{
    CacheStats, HttpImageTransport, ImageLoadedEvent, ImageLoader, ImageLoaderConfig,
    MemoryImageCache,
};
pub use pokeapi::PokeApiClient;
