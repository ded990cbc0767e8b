use std::collections::HashMap;

use crate::blob::Blob;
use crate::label::LabelImage;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Value of pi the coin denomination thresholds were calibrated against.
#[allow(clippy::approx_constant)]
const CALIBRATED_PI: f64 = 3.1415;

#[derive(Clone, Copy)]
struct Accumulator {
    area: usize,
    sum_x: u64,
    sum_y: u64,
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Accumulator {
    fn new(width: usize, height: usize) -> Self {
        Self {
            area: 0,
            sum_x: 0,
            sum_y: 0,
            min_x: width - 1,
            min_y: height - 1,
            max_x: 0,
            max_y: 0,
        }
    }

    fn add(&mut self, x: usize, y: usize) {
        self.area += 1;
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Estimated perimeter: circumference of a circle with radius
/// `(xf - x) / 2`, in integer pixels.
///
/// Only the horizontal extent is used; the coin classification table is tied
/// to this estimate.
pub fn estimate_perimeter(x: usize, xf: usize) -> usize {
    let radius = (xf.saturating_sub(x) / 2) as f64;
    (CALIBRATED_PI * radius * 2.0) as usize
}

/// Fill area, centroid, bounding box and perimeter of every blob.
///
/// Consumes the labeler's list and returns it populated, in the same order.
/// A blob whose label does not occur in `labels` keeps zero geometry.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(labels, blobs), fields(blobs = blobs.len()))
)]
pub fn compute_blob_info(labels: &LabelImage, mut blobs: Vec<Blob>) -> Vec<Blob> {
    let (w, h) = (labels.width(), labels.height());
    if w == 0 || h == 0 {
        return blobs;
    }

    let slots: HashMap<u32, usize> = blobs
        .iter()
        .enumerate()
        .map(|(i, b)| (b.label, i))
        .collect();
    let mut acc = vec![Accumulator::new(w, h); blobs.len()];

    for y in 0..h {
        for x in 0..w {
            let label = labels.get(x, y);
            if label == 0 {
                continue;
            }
            if let Some(&slot) = slots.get(&label) {
                acc[slot].add(x, y);
            }
        }
    }

    for (blob, a) in blobs.iter_mut().zip(&acc) {
        if a.area == 0 {
            continue;
        }
        blob.area = a.area;
        blob.xc = (a.sum_x / a.area as u64) as usize;
        blob.yc = (a.sum_y / a.area as u64) as usize;
        blob.x = a.min_x;
        blob.y = a.min_y;
        blob.xf = a.max_x;
        blob.yf = a.max_y;
        blob.width = a.max_x - a.min_x + 1;
        blob.height = a.max_y - a.min_y + 1;
        blob.perimeter = estimate_perimeter(a.min_x, a.max_x);
    }
    blobs
}
