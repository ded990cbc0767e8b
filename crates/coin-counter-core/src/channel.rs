use crate::error::ImageError;
use crate::image::Image;

/// Copy channel 0 of every pixel into a single-channel image of the same size.
pub fn to_single_channel(src: &Image, dst: &mut Image) -> Result<(), ImageError> {
    dst.require_channels(1)?;
    src.require_same_size(dst)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            dst.set(x, y, 0, src.get(x, y, 0));
        }
    }
    Ok(())
}

/// Replicate a single-channel image into all three channels of `dst`.
pub fn to_triple_channel(src: &Image, dst: &mut Image) -> Result<(), ImageError> {
    src.require_channels(1)?;
    dst.require_channels(3)?;
    src.require_same_size(dst)?;

    for y in 0..src.height() {
        for x in 0..src.width() {
            dst.fill_pixel(x, y, src.get(x, y, 0));
        }
    }
    Ok(())
}
