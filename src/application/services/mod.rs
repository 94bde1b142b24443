//! Application services.

pub mod catalog_pager;
pub mod color_sampler;

pub use catalog_pager::{CatalogPager, DEFAULT_PAGE_SIZE, PREFETCH_MARGIN, PagerConfig};
pub use color_sampler::derive_color;
