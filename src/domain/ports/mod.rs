mod catalog_port;
mod image_cache_port;
mod image_transport_port;

pub use catalog_port::{CatalogPort, RawEntry};
pub use image_cache_port::ImageCachePort;
pub use image_transport_port::ImageTransportPort;
