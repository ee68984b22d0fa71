// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preprocessing chain: grayscale, inversion, adaptive and Otsu
// binarization, morphological cleanup, denoising, and size capping for
// photographed documents.

use heictext_core::types::PreprocessProfile;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};
use tracing::{debug, info, instrument};

use crate::image::processor::ImageProcessor;

/// Neighbourhood statistic used as the local threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveMethod {
    /// Box mean over the block.
    Mean,
    /// Gaussian-weighted mean over the block.
    Gaussian,
}

/// Prepares photographed documents for text recognition.
///
/// Stages are consuming methods so a filter chain reads top to bottom. The
/// working image is kept as 8-bit luma once any stage has converted it.
pub struct ScanEnhancer {
    image: DynamicImage,
}

impl ScanEnhancer {
    // -- Construction ---------------------------------------------------------

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    fn luma(&self) -> GrayImage {
        self.image.to_luma8()
    }

    fn with_luma(gray: GrayImage) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(gray),
        }
    }

    // -- Profiles -------------------------------------------------------------

    /// Run one of the named filter chains and cap the result at `max_side`.
    ///
    /// | profile      | chain                                                     |
    /// |--------------|-----------------------------------------------------------|
    /// | `None`       | (size cap only)                                           |
    /// | `Gentle`     | grayscale → adaptive gaussian (11, 2)                     |
    /// | `Standard`   | grayscale → invert → adaptive gaussian (11, 2) → open(2)  |
    /// | `Aggressive` | grayscale → invert → Otsu → close(2) → open(2)            |
    #[instrument(skip(self), fields(profile = %profile))]
    pub fn apply_profile(self, profile: PreprocessProfile, max_side: u32) -> Self {
        info!("Running preprocessing profile");
        let enhanced = match profile {
            PreprocessProfile::None => self,
            PreprocessProfile::Gentle => self
                .grayscale()
                .adaptive_threshold(11, 2, AdaptiveMethod::Gaussian),
            PreprocessProfile::Standard => self
                .grayscale()
                .invert()
                .adaptive_threshold(11, 2, AdaptiveMethod::Gaussian)
                .morph_close(1)
                .morph_open(2),
            PreprocessProfile::Aggressive => self
                .grayscale()
                .invert()
                .binarize_otsu()
                .morph_close(2)
                .morph_open(2),
        };
        enhanced.fit_within(max_side)
    }

    // -- Stages ---------------------------------------------------------------

    pub fn grayscale(self) -> Self {
        Self::with_luma(self.luma())
    }

    pub fn invert(self) -> Self {
        let mut gray = self.luma();
        image::imageops::invert(&mut gray);
        Self::with_luma(gray)
    }

    /// Adaptive thresholding to a black-and-white image.
    ///
    /// For each pixel the threshold is the local statistic over a
    /// `block_size`×`block_size` neighbourhood minus `c`. Pixels strictly
    /// brighter than the threshold become white, all others black.
    /// `block_size` is forced odd and at least 3. Typical values are 11 and 2.
    #[instrument(skip(self))]
    pub fn adaptive_threshold(self, block_size: u32, c: i32, method: AdaptiveMethod) -> Self {
        let block_size = (block_size.max(3)) | 1;
        let gray = self.luma();
        let (width, height) = gray.dimensions();

        let local: GrayImage = match method {
            AdaptiveMethod::Mean => {
                let integral = compute_integral_image(&gray);
                let radius = block_size / 2;
                GrayImage::from_fn(width, height, |x, y| {
                    let mean = region_mean(&integral, width, height, x, y, radius);
                    Luma([mean.round().clamp(0.0, 255.0) as u8])
                })
            }
            AdaptiveMethod::Gaussian => gaussian_blur_f32(&gray, gaussian_sigma(block_size)),
        };

        let output = GrayImage::from_fn(width, height, |x, y| {
            let value = i32::from(gray.get_pixel(x, y).0[0]);
            let threshold = i32::from(local.get_pixel(x, y).0[0]) - c;
            Luma([if value > threshold { 255u8 } else { 0u8 }])
        });

        debug!("Adaptive threshold complete");
        Self::with_luma(output)
    }

    /// Global binarization with the threshold chosen by Otsu's method.
    #[instrument(skip(self))]
    pub fn binarize_otsu(self) -> Self {
        let gray = self.luma();
        let threshold = otsu_threshold(&gray);
        debug!(threshold, "Otsu threshold computed");

        let mut output = gray;
        for pixel in output.pixels_mut() {
            pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
        }
        Self::with_luma(output)
    }

    /// Morphological opening (erode then dilate) of the white foreground with
    /// a `size`×`size` square kernel. Removes specks smaller than the kernel.
    /// Sizes 0 and 1 are no-ops.
    pub fn morph_open(self, size: u8) -> Self {
        let Some((kernel, reflected)) = square_kernel(size) else {
            return self;
        };
        let eroded = grayscale_erode(&self.luma(), &kernel);
        Self::with_luma(grayscale_dilate(&eroded, &reflected))
    }

    /// Morphological closing (dilate then erode) with a `size`×`size` square
    /// kernel. Fills pinholes. Sizes 0 and 1 are no-ops.
    pub fn morph_close(self, size: u8) -> Self {
        let Some((kernel, reflected)) = square_kernel(size) else {
            return self;
        };
        let dilated = grayscale_dilate(&self.luma(), &kernel);
        Self::with_luma(grayscale_erode(&dilated, &reflected))
    }

    /// Gaussian blur to suppress sensor noise before thresholding.
    pub fn gaussian_denoise(self, sigma: f32) -> Self {
        if sigma <= 0.0 {
            return self;
        }
        Self::with_luma(gaussian_blur_f32(&self.luma(), sigma))
    }

    /// Cap the longest side; see [`ImageProcessor::fit_within`].
    pub fn fit_within(self, max_side: u32) -> Self {
        Self {
            image: ImageProcessor::from_dynamic(self.image)
                .fit_within(max_side)
                .into_dynamic(),
        }
    }
}

/// Gaussian sigma for a kernel of `block_size`, using the same rule OpenCV
/// applies when sigma is left at zero.
fn gaussian_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

// -- Integral image helpers ---------------------------------------------------

/// Summed-area table of a grayscale image.
///
/// `integral[y * (width+1) + x]` holds the sum of all pixels in [0, x) × [0, y).
/// The table is `(width+1) x (height+1)` with a zero-padded border.
fn compute_integral_image(gray: &GrayImage) -> Vec<u64> {
    let (w, h) = gray.dimensions();
    let stride = (w + 1) as usize;
    let mut table = vec![0u64; stride * (h + 1) as usize];

    for y in 0..h {
        let mut row_sum: u64 = 0;
        for x in 0..w {
            row_sum += u64::from(gray.get_pixel(x, y).0[0]);
            let idx = (y + 1) as usize * stride + (x + 1) as usize;
            let above = y as usize * stride + (x + 1) as usize;
            table[idx] = row_sum + table[above];
        }
    }

    table
}

/// Mean pixel value in the square of the given radius around (cx, cy),
/// clamped to the image bounds.
fn region_mean(
    integral: &[u64],
    img_width: u32,
    img_height: u32,
    cx: u32,
    cy: u32,
    radius: u32,
) -> f64 {
    let stride = (img_width + 1) as usize;

    let x1 = cx.saturating_sub(radius) as usize;
    let y1 = cy.saturating_sub(radius) as usize;
    let x2 = ((cx + radius + 1) as usize).min(img_width as usize);
    let y2 = ((cy + radius + 1) as usize).min(img_height as usize);

    let area = ((x2 - x1) * (y2 - y1)) as f64;
    if area == 0.0 {
        return 128.0;
    }

    let sum = integral[y2 * stride + x2] as f64 - integral[y1 * stride + x2] as f64
        - integral[y2 * stride + x1] as f64
        + integral[y1 * stride + x1] as f64;

    sum / area
}

/// A square structuring element anchored at its top-left corner, and its
/// reflection. Pairing them keeps even-sized openings and closings in place.
fn square_kernel(size: u8) -> Option<(Mask, Mask)> {
    if size <= 1 {
        return None;
    }
    let square = GrayImage::from_pixel(u32::from(size), u32::from(size), Luma([255u8]));
    Some((
        Mask::from_image(&square, 0, 0),
        Mask::from_image(&square, size - 1, size - 1),
    ))
}

/// Otsu threshold: the level maximising between-class variance of the dark
/// and light pixel groups. Pixels above the returned level are "light".
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = u64::from(gray.width()) * u64::from(gray.height());
    if total_pixels == 0 {
        return 128;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background = 0.0f64;
    let mut weight_background = 0u64;
    let mut max_variance = 0.0f64;
    let mut best_threshold = 0u8;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}
