//! Binary dilation and erosion with a square structuring element.
//!
//! Only channel 0 of the source is inspected and a pixel counts as set when
//! it equals 255. Neighbors that fall outside the image are skipped rather
//! than treated as background, so erosion keeps border pixels that have only
//! a partial neighborhood inside the image.

use crate::error::ImageError;
use crate::image::{Image, MAX_LEVEL};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Binary dilation: a pixel becomes 255 when any in-bounds neighbor is 255.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, dst), fields(width = src.width(), height = src.height()))
)]
pub fn dilate(src: &Image, dst: &mut Image, kernel: usize) -> Result<(), ImageError> {
    apply(src, dst, kernel, |hits, _| hits > 0)
}

/// Binary erosion: a pixel stays 255 only when every in-bounds neighbor is 255.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, dst), fields(width = src.width(), height = src.height()))
)]
pub fn erode(src: &Image, dst: &mut Image, kernel: usize) -> Result<(), ImageError> {
    apply(src, dst, kernel, |hits, visited| hits == visited)
}

fn apply(
    src: &Image,
    dst: &mut Image,
    kernel: usize,
    keep: impl Fn(usize, usize) -> bool,
) -> Result<(), ImageError> {
    if kernel == 0 || kernel % 2 == 0 {
        return Err(ImageError::InvalidKernel(kernel));
    }
    src.require_same_size(dst)?;

    let bound = kernel / 2;
    let (w, h) = (src.width(), src.height());

    for y in 0..h {
        let y0 = y.saturating_sub(bound);
        let y1 = (y + bound).min(h - 1);
        for x in 0..w {
            let x0 = x.saturating_sub(bound);
            let x1 = (x + bound).min(w - 1);

            let mut hits = 0usize;
            let mut visited = 0usize;
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    visited += 1;
                    if src.get(nx, ny, 0) == MAX_LEVEL {
                        hits += 1;
                    }
                }
            }

            let value = if keep(hits, visited) { MAX_LEVEL } else { 0 };
            dst.fill_pixel(x, y, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(width: usize, height: usize, on: &[(usize, usize)]) -> Image {
        let mut img = Image::new(width, height, 1).expect("mask");
        for &(x, y) in on {
            img.set(x, y, 0, 255);
        }
        img
    }

    #[test]
    fn kernel_one_is_identity() {
        let src = mask(5, 4, &[(0, 0), (2, 1), (3, 1), (4, 3)]);
        let mut dst = Image::new(5, 4, 1).expect("dst");

        dilate(&src, &mut dst, 1).expect("dilate");
        assert_eq!(dst, src);

        erode(&src, &mut dst, 1).expect("erode");
        assert_eq!(dst, src);
    }

    #[test]
    fn rejects_even_and_zero_kernels() {
        let src = mask(3, 3, &[]);
        let mut dst = mask(3, 3, &[(1, 1)]);
        assert_eq!(dilate(&src, &mut dst, 2), Err(ImageError::InvalidKernel(2)));
        assert_eq!(erode(&src, &mut dst, 0), Err(ImageError::InvalidKernel(0)));
        assert_eq!(dst.get(1, 1, 0), 255);
    }

    #[test]
    fn dilation_grows_single_pixel_to_kernel_square() {
        let src = mask(7, 7, &[(3, 3)]);
        let mut dst = Image::new(7, 7, 1).expect("dst");
        dilate(&src, &mut dst, 3).expect("dilate");

        let on: usize = dst.data().iter().filter(|&&v| v == 255).count();
        assert_eq!(on, 9);
        for y in 2..=4 {
            for x in 2..=4 {
                assert_eq!(dst.get(x, y, 0), 255);
            }
        }
    }

    #[test]
    fn erosion_skips_out_of_bounds_neighbors() {
        // a 2x2 block in the top-left corner: pixel (0,0) sees only the block
        // itself inside the image, so it survives a 3x3 erosion.
        let src = mask(6, 6, &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let mut dst = Image::new(6, 6, 1).expect("dst");
        erode(&src, &mut dst, 3).expect("erode");

        assert_eq!(dst.get(0, 0, 0), 255);
        assert_eq!(dst.get(1, 1, 0), 0);
        assert_eq!(dst.data().iter().filter(|&&v| v == 255).count(), 1);
    }

    #[test]
    fn three_channel_destination_gets_every_channel() {
        let src = mask(3, 3, &[(1, 1)]);
        let mut dst = Image::new(3, 3, 3).expect("dst");
        dilate(&src, &mut dst, 3).expect("dilate");
        assert!(dst.data().iter().all(|&v| v == 255));
    }
}
