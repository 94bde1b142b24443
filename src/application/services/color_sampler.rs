//! Representative color extraction for selected items.

use image::imageops::{self, FilterType};

use crate::domain::entities::AccentColor;

/// Width and height the image is sampled at.
pub const SAMPLE_SIZE: u32 = 40;

/// Pixels at or below this alpha (0..=1) count as transparent.
const MIN_ALPHA: f32 = 0.01;

/// Pixels at or below this mean channel value (0..=1) count as near-black.
const MIN_BRIGHTNESS: f32 = 0.1;

/// Averages the visible, non-black pixels of `image`.
///
/// The image is downsampled to [`SAMPLE_SIZE`] square with nearest-neighbour
/// filtering, so every sample is an actual image pixel. Returns `None` when
/// no pixel qualifies.
#[must_use]
pub fn derive_color(image: &image::DynamicImage) -> Option<AccentColor> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }

    let sample = imageops::resize(
        &image.to_rgba8(),
        SAMPLE_SIZE,
        SAMPLE_SIZE,
        FilterType::Nearest,
    );

    let mut totals = [0_u64; 3];
    let mut count = 0_u64;

    for pixel in sample.pixels() {
        let [r, g, b, a] = pixel.0;

        if f32::from(a) / 255.0 <= MIN_ALPHA {
            continue;
        }

        let brightness = (f32::from(r) + f32::from(g) + f32::from(b)) / 3.0 / 255.0;
        if brightness <= MIN_BRIGHTNESS {
            continue;
        }

        totals[0] += u64::from(r);
        totals[1] += u64::from(g);
        totals[2] += u64::from(b);
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let mean = |total: u64| -> u8 {
        // Rounded mean of u8 samples always fits in u8.
        u8::try_from((total + count / 2) / count).unwrap_or(u8::MAX)
    };

    Some(AccentColor::new(
        mean(totals[0]),
        mean(totals[1]),
        mean(totals[2]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn filled(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn test_fully_transparent_yields_none() {
        assert_eq!(derive_color(&filled(64, 64, [255, 255, 255, 0])), None);
    }

    #[test]
    fn test_pure_black_yields_none() {
        assert_eq!(derive_color(&filled(64, 64, [0, 0, 0, 255])), None);
    }

    #[test]
    fn test_empty_image_yields_none() {
        assert_eq!(derive_color(&DynamicImage::new_rgba8(0, 0)), None);
    }

    #[test]
    fn test_half_red_half_transparent_is_pure_red() {
        let image = RgbaImage::from_fn(96, 96, |x, _| {
            if x < 48 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        assert_eq!(
            derive_color(&DynamicImage::ImageRgba8(image)),
            Some(AccentColor::new(255, 0, 0))
        );
    }

    #[test]
    fn test_black_outline_is_ignored() {
        let image = RgbaImage::from_fn(80, 80, |x, y| {
            if x < 8 || y < 8 || x >= 72 || y >= 72 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([40, 160, 220, 255])
            }
        });

        assert_eq!(
            derive_color(&DynamicImage::ImageRgba8(image)),
            Some(AccentColor::new(40, 160, 220))
        );
    }

    #[test]
    fn test_uniform_color_survives_upsampling() {
        assert_eq!(
            derive_color(&filled(8, 8, [200, 100, 50, 255])),
            Some(AccentColor::new(200, 100, 50))
        );
    }

    #[test]
    fn test_thresholds() {
        // alpha 2/255 is below 1%
        assert_eq!(derive_color(&filled(4, 4, [255, 255, 255, 2])), None);
        // mean 20/255 is below 10%
        assert_eq!(derive_color(&filled(4, 4, [20, 20, 20, 255])), None);
        assert_eq!(
            derive_color(&filled(4, 4, [30, 30, 30, 255])),
            Some(AccentColor::new(30, 30, 30))
        );
    }

    #[test]
    fn test_deterministic() {
        let image = RgbaImage::from_fn(50, 70, |x, y| {
            Rgba([(x * 5) as u8, (y * 3) as u8, 128, 255])
        });
        let image = DynamicImage::ImageRgba8(image);

        assert_eq!(derive_color(&image), derive_color(&image));
    }
}
