//! Domain entity definitions.

mod color;
mod image;
mod image_url;
mod item;
mod paging;

pub use color::AccentColor;
pub use image::{ImageSource, LoadedImage};
pub use image_url::{DEFAULT_IMAGE_URL_TEMPLATE, ID_PLACEHOLDER, ImageUrlTemplate};
pub use item::{Item, ItemId, capitalize_words};
pub use paging::PagingState;
