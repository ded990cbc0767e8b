//! Adapters between `image` crate buffers and the pipeline's [`Image`].

use std::path::Path;

use ::image::RgbImage;

use crate::core::{convert_channel_order, Image, ImageError};

/// Errors produced while loading frames from disk.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Decode(#[from] ::image::ImageError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Copy an RGB image into a 3-channel frame in capture (BGR) order.
pub fn frame_from_rgb(img: &RgbImage) -> Result<Image, ImageError> {
    let mut frame = Image::from_raw(
        img.width() as usize,
        img.height() as usize,
        3,
        img.as_raw().clone(),
    )?;
    convert_channel_order(&mut frame)?;
    Ok(frame)
}

/// Convert a capture-order frame back to an RGB image for saving.
///
/// Returns `None` for single-channel images.
pub fn rgb_from_frame(frame: &Image) -> Option<RgbImage> {
    if frame.channels() != 3 {
        return None;
    }
    let mut rgb = Image::new(frame.width(), frame.height(), 3).ok()?;
    rgb.copy_from(frame).ok()?;
    convert_channel_order(&mut rgb).ok()?;
    RgbImage::from_raw(frame.width() as u32, frame.height() as u32, rgb.into_raw())
}

/// Decode an image file into a capture-order frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<Image, DetectError> {
    let img = ::image::open(path.as_ref())?.to_rgb8();
    Ok(frame_from_rgb(&img)?)
}
