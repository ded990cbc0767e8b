//! Edge extraction and overlay drawing on 3-channel canvases.
//!
//! Colors are written in the canvas' own channel order; the pipeline draws
//! on frames in capture (BGR) order.

use crate::error::ImageError;
use crate::image::Image;

/// Edge highlight color.
pub const EDGE_COLOR: [u8; 3] = [0, 255, 0];
/// Bounding box outline color.
pub const BOX_COLOR: [u8; 3] = [255, 0, 255];
/// Centroid marker color.
pub const CENTROID_COLOR: [u8; 3] = [255, 0, 0];

/// Prewitt gradient magnitude of a single-channel image.
///
/// Each gradient is the difference of two 3-pixel column (or row) sums,
/// divided by 6 with integer truncation. Border pixels are set to 0.
pub fn prewitt_edges(src: &Image, dst: &mut Image) -> Result<(), ImageError> {
    src.require_channels(1)?;
    dst.require_channels(1)?;
    src.require_same_size(dst)?;

    dst.fill(0);
    let (w, h) = (src.width(), src.height());
    if w < 3 || h < 3 {
        return Ok(());
    }

    let p = |x: usize, y: usize| src.get(x, y, 0) as i32;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let right = p(x + 1, y - 1) + p(x + 1, y) + p(x + 1, y + 1);
            let left = p(x - 1, y - 1) + p(x - 1, y) + p(x - 1, y + 1);
            let bottom = p(x - 1, y + 1) + p(x, y + 1) + p(x + 1, y + 1);
            let top = p(x - 1, y - 1) + p(x, y - 1) + p(x + 1, y - 1);

            let gx = (right - left) / 6;
            let gy = (bottom - top) / 6;
            let mag = ((gx * gx + gy * gy) as f64).sqrt();
            dst.set(x, y, 0, mag as u8);
        }
    }
    Ok(())
}

/// Paint every non-zero pixel of a single-channel edge map onto `canvas`.
pub fn draw_edges(edges: &Image, canvas: &mut Image) -> Result<(), ImageError> {
    edges.require_channels(1)?;
    canvas.require_channels(3)?;
    edges.require_same_size(canvas)?;

    for y in 0..edges.height() {
        for x in 0..edges.width() {
            if edges.get(x, y, 0) != 0 {
                canvas.put_color(x, y, EDGE_COLOR);
            }
        }
    }
    Ok(())
}

/// One-pixel rectangle outline; the parts outside the canvas are clipped.
pub fn draw_rect_outline(
    canvas: &mut Image,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    color: [u8; 3],
) -> Result<(), ImageError> {
    canvas.require_channels(3)?;
    if width == 0 || height == 0 {
        return Ok(());
    }

    let x_end = x + width - 1;
    let y_end = y + height - 1;
    let (cw, ch) = (canvas.width(), canvas.height());

    for px in x..=x_end.min(cw.saturating_sub(1)) {
        for py in [y, y_end] {
            if py < ch {
                canvas.put_color(px, py, color);
            }
        }
    }
    for py in y..=y_end.min(ch.saturating_sub(1)) {
        for px in [x, x_end] {
            if px < cw {
                canvas.put_color(px, py, color);
            }
        }
    }
    Ok(())
}

/// Cross marker: a horizontal and a vertical run of `2 * half` pixels
/// through `(cx, cy)`. Pixels outside the canvas are skipped.
pub fn draw_cross(
    canvas: &mut Image,
    cx: usize,
    cy: usize,
    half: usize,
    color: [u8; 3],
) -> Result<(), ImageError> {
    canvas.require_channels(3)?;
    let (w, h) = (canvas.width() as isize, canvas.height() as isize);
    let (cx, cy, half) = (cx as isize, cy as isize, half as isize);

    for j in -half..half {
        let (hx, hy) = (cx + j, cy);
        if (0..w).contains(&hx) && (0..h).contains(&hy) {
            canvas.put_color(hx as usize, hy as usize, color);
        }
        let (vx, vy) = (cx, cy - j);
        if (0..w).contains(&vx) && (0..h).contains(&vy) {
            canvas.put_color(vx as usize, vy as usize, color);
        }
    }
    Ok(())
}
