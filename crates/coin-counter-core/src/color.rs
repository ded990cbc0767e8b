//! Color-space conversion and HSV window segmentation.
//!
//! HSV images use the packed 8-bit layout produced by [`rgb_to_hsv`]:
//! channel 0 is hue rescaled from 0..360 to 0..255, channel 1 is saturation
//! rescaled from 0..1 to 0..255, channel 2 is the unscaled value (max of the
//! RGB components).

use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::image::{Image, MAX_LEVEL};

/// Swap channels 0 and 2 of every pixel in place (BGR <-> RGB).
///
/// Applying it twice restores the original buffer.
pub fn convert_channel_order(image: &mut Image) -> Result<(), ImageError> {
    image.require_channels(3)?;
    for y in 0..image.height() {
        for x in 0..image.width() {
            image.pixel_mut(x, y).swap(0, 2);
        }
    }
    Ok(())
}

/// Convert an RGB image into packed 8-bit HSV.
pub fn rgb_to_hsv(src: &Image, dst: &mut Image) -> Result<(), ImageError> {
    src.require_channels(3)?;
    dst.require_channels(3)?;
    src.require_same_size(dst)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            let p = src.pixel(x, y);
            let hsv = hsv_from_rgb(p[0], p[1], p[2]);
            dst.put_color(x, y, hsv);
        }
    }
    Ok(())
}

/// Packed HSV triple for one RGB pixel.
pub fn hsv_from_rgb(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == 0.0 {
        return [0, 0, 0];
    }

    let v = max;
    if max == min {
        return [0, 0, v as u8];
    }

    let delta = max - min;
    let s = delta / v;
    let h = if r == max {
        if g >= b {
            60.0 * (g - b) / delta
        } else {
            360.0 + 60.0 * (g - b) / delta
        }
    } else if g == max {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };

    [(h / 360.0 * 255.0) as u8, (s * 255.0) as u8, v as u8]
}

/// Inclusive HSV acceptance window.
///
/// Hue is in degrees (0..360), saturation and value in percent (0..100).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvWindow {
    pub h_min: u16,
    pub h_max: u16,
    pub s_min: u16,
    pub s_max: u16,
    pub v_min: u16,
    pub v_max: u16,
}

impl HsvWindow {
    pub const fn new(h: (u16, u16), s: (u16, u16), v: (u16, u16)) -> Self {
        Self {
            h_min: h.0,
            h_max: h.1,
            s_min: s.0,
            s_max: s.1,
            v_min: v.0,
            v_max: v.1,
        }
    }

    /// Test one packed HSV pixel against the window.
    ///
    /// The pixel's own components are rescaled to degrees/percent and each is
    /// checked for membership in its range.
    pub fn contains(&self, hsv: &[u8]) -> bool {
        let h = hsv[0] as f32 / 255.0 * 360.0;
        let s = hsv[1] as f32 / 255.0 * 100.0;
        let v = hsv[2] as f32 / 255.0 * 100.0;

        h >= self.h_min as f32
            && h <= self.h_max as f32
            && s >= self.s_min as f32
            && s <= self.s_max as f32
            && v >= self.v_min as f32
            && v <= self.v_max as f32
    }
}

/// Threshold a packed HSV image: white where the pixel falls inside `window`,
/// black elsewhere. `dst` may have 1 or 3 channels; all are written.
pub fn segment_hsv(src: &Image, dst: &mut Image, window: &HsvWindow) -> Result<(), ImageError> {
    src.require_channels(3)?;
    src.require_same_size(dst)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            let value = if window.contains(src.pixel(x, y)) {
                MAX_LEVEL
            } else {
                0
            };
            dst.fill_pixel(x, y, value);
        }
    }
    Ok(())
}

/// Pixel-wise OR of `src` into `dst`.
///
/// Used to merge the masks of several HSV windows into one working mask.
pub fn union_into(src: &Image, dst: &mut Image) -> Result<(), ImageError> {
    dst.require_channels(src.channels())?;
    src.require_same_size(dst)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            let a = src.pixel(x, y);
            for (d, &s) in dst.pixel_mut(x, y).iter_mut().zip(a) {
                *d |= s;
            }
        }
    }
    Ok(())
}
