use coin_counter_core::{draw_cross, draw_rect_outline, Image, ImageError, BOX_COLOR, CENTROID_COLOR};

use crate::blob::Blob;

/// Inset applied to each side of a bounding box before drawing it.
pub const BOX_INSET: usize = 20;
/// Half length of the centroid cross arms.
pub const CENTROID_MARK_HALF: usize = 5;

/// Outline every blob's bounding box, inset by [`BOX_INSET`] on each side.
///
/// Boxes too small to survive the inset are skipped.
pub fn draw_bounding_boxes(canvas: &mut Image, blobs: &[Blob]) -> Result<(), ImageError> {
    for blob in blobs {
        let (Some(w), Some(h)) = (
            blob.width.checked_sub(2 * BOX_INSET),
            blob.height.checked_sub(2 * BOX_INSET),
        ) else {
            continue;
        };
        if w == 0 || h == 0 {
            continue;
        }
        draw_rect_outline(canvas, blob.x + BOX_INSET, blob.y + BOX_INSET, w, h, BOX_COLOR)?;
    }
    Ok(())
}

/// Mark every blob centroid with a small cross.
pub fn draw_centroids(canvas: &mut Image, blobs: &[Blob]) -> Result<(), ImageError> {
    for blob in blobs {
        draw_cross(canvas, blob.xc, blob.yc, CENTROID_MARK_HALF, CENTROID_COLOR)?;
    }
    Ok(())
}
