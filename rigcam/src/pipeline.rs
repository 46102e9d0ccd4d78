//! Capture processing pipeline: decode, region-of-interest masking and
//! per-channel color averaging.

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use chrono::Utc;
use image::{ImageReader, Rgb, RgbImage};
use tracing::debug;

use crate::RigcamResult;

/// Per-channel averages over the non-zero pixels of a masked image.
///
/// Channel order is RGB. A channel with no non-zero pixels (for example
/// a mask that covers nothing) averages to NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbSample {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Decode raw capture bytes into an 8-bit RGB image.
///
/// # Errors
/// Returns [`crate::CameraError::Image`] if the bytes are not a valid
/// encoded image.
pub fn decode_image(raw: &[u8]) -> RigcamResult<RgbImage> {
    let cursor = Cursor::new(raw);
    let image = ImageReader::new(cursor).with_guessed_format()?.decode()?;
    Ok(image.to_rgb8())
}

/// Zero every pixel outside a filled circle of `radius` pixels around
/// `center`, leaving pixels inside the circle unchanged.
///
/// A radius of 0 zeroes the whole image. No bounds validation is done:
/// a circle partially or fully outside the image silently produces a
/// partially- or fully-zero result.
pub fn mask_image(image: &RgbImage, center: (u32, u32), radius: u32) -> RgbImage {
    let (cx, cy) = (i64::from(center.0), i64::from(center.1));
    let r2 = i64::from(radius) * i64::from(radius);

    let mut masked = image.clone();
    for (x, y, pixel) in masked.enumerate_pixels_mut() {
        let dx = i64::from(x) - cx;
        let dy = i64::from(y) - cy;
        if dx * dx + dy * dy >= r2 {
            *pixel = Rgb([0, 0, 0]);
        }
    }
    masked
}

/// Average each channel over its non-zero pixels.
///
/// Masked-out pixels are zero in every channel and so contribute
/// nothing to the means. Genuinely black pixels inside the mask are
/// indistinguishable from masked-out ones and are likewise excluded.
pub fn rgb_average(image: &RgbImage) -> RgbSample {
    let mut sums = [0.0f64; 3];
    let mut counts = [0u64; 3];

    for pixel in image.pixels() {
        for (channel, &value) in pixel.0.iter().enumerate() {
            if value != 0 {
                sums[channel] += f64::from(value);
                counts[channel] += 1;
            }
        }
    }

    let mean = |channel: usize| {
        if counts[channel] == 0 {
            f64::NAN
        } else {
            sums[channel] / counts[channel] as f64
        }
    };

    RgbSample {
        r: mean(0),
        g: mean(1),
        b: mean(2),
    }
}

/// Run the full processing pipeline on raw capture bytes.
///
/// Decodes, masks to the region of interest, writes both the full and
/// the masked frame into `out_dir` as timestamped JPEG artifacts, and
/// returns the per-channel averages of the masked frame. Two files are
/// written per call; they are never cleaned up.
///
/// # Errors
/// Fails on decode errors or if the artifacts cannot be written.
pub fn process_image(
    raw: &[u8],
    center: (u32, u32),
    radius: u32,
    out_dir: &Path,
) -> RigcamResult<RgbSample> {
    let image = decode_image(raw)?;
    let masked = mask_image(&image, center, radius);

    let timestamp = Utc::now().timestamp_millis();
    fs::create_dir_all(out_dir)?;
    let full_path = out_dir.join(format!("sampleimage_full_{timestamp}.jpg"));
    let masked_path = out_dir.join(format!("sampleimage_masked_{timestamp}.jpg"));
    image.save(&full_path)?;
    masked.save(&masked_path)?;
    debug!(
        "wrote capture artifacts {} and {}",
        full_path.display(),
        masked_path.display()
    );

    Ok(rgb_average(&masked))
}

/// Render a preview of raw capture bytes into `out_dir`.
///
/// Decodes and, with `masked` set, applies the region-of-interest mask
/// to the decoded frame before writing a timestamped PNG. Returns the
/// path of the written preview.
pub fn render_preview(
    raw: &[u8],
    masked: bool,
    center: (u32, u32),
    radius: u32,
    out_dir: &Path,
) -> RigcamResult<PathBuf> {
    let mut image = decode_image(raw)?;
    if masked {
        image = mask_image(&image, center, radius);
    }

    let timestamp = Utc::now().timestamp_millis();
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("preview_{timestamp}.png"));
    image.save(&path)?;
    Ok(path)
}
