use crate::error::ImageError;
use crate::image::Image;

/// Per-channel median filter over a `kernel x kernel` window.
///
/// Borders are handled by replicating the edge pixels, so every output pixel
/// takes the median of exactly `kernel * kernel` samples.
pub fn median_blur(src: &Image, dst: &mut Image, kernel: usize) -> Result<(), ImageError> {
    if kernel == 0 || kernel % 2 == 0 {
        return Err(ImageError::InvalidKernel(kernel));
    }
    dst.require_channels(src.channels())?;
    src.require_same_size(dst)?;

    let r = (kernel / 2) as isize;
    let (w, h) = (src.width() as isize, src.height() as isize);
    let mid = kernel * kernel / 2;
    let mut window = Vec::with_capacity(kernel * kernel);

    for y in 0..h {
        for x in 0..w {
            for c in 0..src.channels() {
                window.clear();
                for dy in -r..=r {
                    let sy = (y + dy).clamp(0, h - 1) as usize;
                    for dx in -r..=r {
                        let sx = (x + dx).clamp(0, w - 1) as usize;
                        window.push(src.get(sx, sy, c));
                    }
                }
                let (_, median, _) = window.select_nth_unstable(mid);
                dst.set(x as usize, y as usize, c, *median);
            }
        }
    }
    Ok(())
}
