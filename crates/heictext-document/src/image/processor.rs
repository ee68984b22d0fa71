// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: quarter-turn and arbitrary rotation, size capping,
// grayscale, and inversion. Operates on in-memory images using the `image`
// and `imageproc` crates.

use std::path::Path;

use heictext_core::error::{HeicTextError, Result};
use heictext_core::types::Rotation;
use image::{DynamicImage, ImageFormat, RgbaImage};
use imageproc::geometric_transformations::{self, Interpolation};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns a new `ImageProcessor` wrapping the
/// transformed image, enabling method chaining.
///
/// ```ignore
/// let png = ImageProcessor::open("page.png")?
///     .rotate(Rotation::Deg90)
///     .fit_within(4000)
///     .grayscale()
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            HeicTextError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (PNG, JPEG, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            HeicTextError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self { image: img })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Lossless clockwise quarter-turn. The canvas swaps width and height for
    /// 90° and 270°.
    pub fn rotate(self, rotation: Rotation) -> Self {
        let image = match rotation {
            Rotation::Deg0 => self.image,
            Rotation::Deg90 => self.image.rotate90(),
            Rotation::Deg180 => self.image.rotate180(),
            Rotation::Deg270 => self.image.rotate270(),
        };
        Self { image }
    }

    /// Rotate by an arbitrary angle in degrees (clockwise).
    ///
    /// Multiples of 90 take the lossless path. Other angles use bilinear
    /// interpolation about the centre on a canvas of the same size, filling
    /// uncovered corners with white so they read as page background.
    #[instrument(skip(self))]
    pub fn rotate_degrees(self, degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        for rotation in Rotation::ALL {
            let target = f32::from(rotation.degrees());
            if (normalised - target).abs() < 0.01 || (normalised - target - 360.0).abs() < 0.01 {
                return self.rotate(rotation);
            }
        }

        let rgba = self.image.to_rgba8();
        let rotated: RgbaImage = geometric_transformations::rotate_about_center(
            &rgba,
            degrees.to_radians(),
            Interpolation::Bilinear,
            image::Rgba([255u8, 255, 255, 255]),
        );
        debug!("General rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(rotated),
        }
    }

    /// Downscale so that neither side exceeds `max_side`, preserving aspect
    /// ratio (Lanczos3). Images already within the limit are returned as-is;
    /// this never upscales.
    #[instrument(skip(self))]
    pub fn fit_within(self, max_side: u32) -> Self {
        let (w, h) = (self.image.width(), self.image.height());
        if max_side == 0 || w.max(h) <= max_side {
            return self;
        }
        let resized = self
            .image
            .resize(max_side, max_side, image::imageops::FilterType::Lanczos3);
        info!(
            from_w = w,
            from_h = h,
            to_w = resized.width(),
            to_h = resized.height(),
            "Image downscaled"
        );
        Self { image: resized }
    }

    /// Convert to 8-bit luma.
    pub fn grayscale(self) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        }
    }

    /// Invert all colour channels (white ↔ black).
    pub fn invert(mut self) -> Self {
        self.image.invert();
        self
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }

    /// Write the image to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            HeicTextError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Encode a `DynamicImage` as PNG, returning the raw bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| HeicTextError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn marked_image() -> DynamicImage {
        // 4x2 image with a single black pixel in the top-left corner.
        let mut img = GrayImage::from_pixel(4, 2, Luma([255u8]));
        img.put_pixel(0, 0, Luma([0u8]));
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let rotated = ImageProcessor::from_dynamic(marked_image()).rotate(Rotation::Deg90);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
        let flipped = ImageProcessor::from_dynamic(marked_image()).rotate(Rotation::Deg180);
        assert_eq!((flipped.width(), flipped.height()), (4, 2));
    }

    #[test]
    fn rotation_is_clockwise() {
        // Clockwise 90°: the top-left pixel moves to the top-right corner.
        let rotated = ImageProcessor::from_dynamic(marked_image())
            .rotate(Rotation::Deg90)
            .into_dynamic()
            .to_luma8();
        assert_eq!(rotated.get_pixel(1, 0).0[0], 0);
        assert_eq!(rotated.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn inverse_rotation_restores_pixels() {
        let original = marked_image().to_luma8();
        for rotation in Rotation::ALL {
            let restored = ImageProcessor::from_dynamic(marked_image())
                .rotate(rotation)
                .rotate(rotation.inverse())
                .into_dynamic()
                .to_luma8();
            assert_eq!(restored, original, "round trip through {rotation}");
        }
    }

    #[test]
    fn rotate_degrees_takes_lossless_path_for_right_angles() {
        let rotated = ImageProcessor::from_dynamic(marked_image()).rotate_degrees(-90.0);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
    }

    #[test]
    fn fit_within_caps_longest_side() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(800, 200));
        let fitted = ImageProcessor::from_dynamic(img).fit_within(400);
        assert_eq!(fitted.width(), 400);
        assert_eq!(fitted.height(), 100);
    }

    #[test]
    fn fit_within_never_upscales() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(300, 200));
        let fitted = ImageProcessor::from_dynamic(img).fit_within(4000);
        assert_eq!((fitted.width(), fitted.height()), (300, 200));
    }

    #[test]
    fn invert_flips_luma() {
        let inverted = ImageProcessor::from_dynamic(marked_image())
            .invert()
            .into_dynamic()
            .to_luma8();
        assert_eq!(inverted.get_pixel(0, 0).0[0], 255);
        assert_eq!(inverted.get_pixel(1, 0).0[0], 0);
    }

    #[test]
    fn png_bytes_decode_back() {
        let bytes = ImageProcessor::from_dynamic(marked_image()).to_png_bytes().unwrap();
        let decoded = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
    }
}
