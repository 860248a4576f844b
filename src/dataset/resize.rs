//! Aspect-preserving resize, either to a pixel budget or to a longest side.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};

use crate::error::PagemaskError;

/// Output size for a `width` x `height` image under a pixel budget.
///
/// `ratio = sqrt(budget / (width * height))`, each side scaled by `ratio`,
/// rounded and kept at least 1 px. Without a budget the size is unchanged.
pub fn target_dimensions(width: u32, height: u32, budget: Option<u64>) -> (u32, u32) {
    let Some(budget) = budget else {
        return (width, height);
    };
    if width == 0 || height == 0 {
        return (width, height);
    }

    let ratio = (budget as f64 / (width as f64 * height as f64)).sqrt();
    let scale = |side: u32| ((side as f64 * ratio).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Output size for a `width` x `height` image whose longest side may not
/// exceed `max_side`.
///
/// The longest side becomes `max_side` and the other side is scaled by the
/// same ratio, rounded up. Images already within the limit are not enlarged.
pub fn longest_side_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side || max_side == 0 {
        return (width, height);
    }

    let ratio = max_side as f64 / longest as f64;
    let scale = |side: u32| {
        if side == longest {
            max_side
        } else {
            ((side as f64 * ratio).ceil() as u32).clamp(1, max_side)
        }
    };
    (scale(width), scale(height))
}

/// What a resized output is fitted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeTarget {
    /// Scale so that `width * height` is close to this many pixels.
    PixelBudget(u64),
    /// Shrink so that the longest side is at most this many pixels.
    LongestSide(u32),
}

impl ResizeTarget {
    pub fn dimensions(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            ResizeTarget::PixelBudget(budget) => target_dimensions(width, height, Some(budget)),
            ResizeTarget::LongestSide(max_side) => longest_side_dimensions(width, height, max_side),
        }
    }
}

/// How pixel values are interpolated while resizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// Bilinear; for photographs.
    Linear,
    /// Nearest neighbour; for label masks, so no blended label values appear.
    Nearest,
}

impl Interpolation {
    fn filter(self) -> FilterType {
        match self {
            Interpolation::Linear => FilterType::Triangle,
            Interpolation::Nearest => FilterType::Nearest,
        }
    }
}

/// Resize (when a target is given) and save an image in the given format.
pub fn save_resized(
    image: &RgbImage,
    path: &Path,
    target: Option<ResizeTarget>,
    interpolation: Interpolation,
    format: ImageFormat,
) -> Result<(u32, u32), PagemaskError> {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = match target {
        Some(target) => target.dimensions(width, height),
        None => (width, height),
    };

    let encode_err = |source| PagemaskError::ImageEncode {
        path: path.to_path_buf(),
        source,
    };

    if (new_width, new_height) == (width, height) {
        image.save_with_format(path, format).map_err(encode_err)?;
    } else {
        imageops::resize(image, new_width, new_height, interpolation.filter())
            .save_with_format(path, format)
            .map_err(encode_err)?;
    }

    Ok((new_width, new_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn no_budget_keeps_size() {
        assert_eq!(target_dimensions(640, 480, None), (640, 480));
    }

    #[test]
    fn budget_preserves_aspect_ratio() {
        let (w, h) = target_dimensions(2000, 1000, Some(500_000));
        assert_eq!((w, h), (1000, 500));

        let (w, h) = target_dimensions(3000, 4000, Some(1_000_000));
        assert_eq!((w, h), (866, 1155));
        assert!(((w * h) as f64 - 1_000_000.0).abs() / 1_000_000.0 < 0.01);
    }

    #[test]
    fn tiny_budget_keeps_one_pixel() {
        assert_eq!(target_dimensions(100, 1, Some(1)), (10, 1));
    }

    #[test]
    fn longest_side_shrinks_and_rounds_short_side_up() {
        assert_eq!(longest_side_dimensions(3000, 2000, 1280), (1280, 854));
        assert_eq!(longest_side_dimensions(2000, 3001, 1000), (667, 1000));
        assert_eq!(longest_side_dimensions(500, 500, 100), (100, 100));
        assert_eq!(longest_side_dimensions(4000, 1, 100), (100, 1));
    }

    #[test]
    fn longest_side_never_enlarges() {
        assert_eq!(longest_side_dimensions(800, 600, 2048), (800, 600));
        assert_eq!(
            ResizeTarget::LongestSide(2048).dimensions(800, 600),
            (800, 600)
        );
    }

    #[test]
    fn nearest_resize_keeps_label_values() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("mask.png");

        let mut mask = RgbImage::new(40, 20);
        for x in 0..20 {
            for y in 0..20 {
                mask.put_pixel(x, y, Rgb([255, 0, 0]));
            }
        }

        let dims = save_resized(
            &mask,
            &path,
            Some(ResizeTarget::PixelBudget(200)),
            Interpolation::Nearest,
            ImageFormat::Png,
        )
        .expect("save mask");
        assert_eq!(dims, (20, 10));

        let reread = image::open(&path).expect("open mask").to_rgb8();
        assert_eq!(reread.dimensions(), (20, 10));
        assert!(reread
            .pixels()
            .all(|p| p.0 == [255, 0, 0] || p.0 == [0, 0, 0]));
    }
}
