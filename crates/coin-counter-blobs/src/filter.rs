use serde::{Deserialize, Serialize};

use coin_counter_core::Image;

use crate::blob::Blob;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Acceptance window for the circularity test.
///
/// A filled disc covers pi/4 of its bounding box, so its box-to-area ratio is
/// about 1.27; squares sit at 1.0 and thin or ragged shapes well above 1.35.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularityParams {
    /// Exclusive lower bound of `bounding box area / area`.
    pub min_ratio: f32,
    /// Exclusive upper bound of `bounding box area / area`.
    pub max_ratio: f32,
    /// Blobs must be strictly larger than this many pixels.
    pub min_area: usize,
}

impl Default for CircularityParams {
    fn default() -> Self {
        Self {
            min_ratio: 1.2,
            max_ratio: 1.351,
            min_area: 1400,
        }
    }
}

/// Circularity test on a populated blob.
pub fn is_circular(blob: &Blob, params: &CircularityParams) -> bool {
    if blob.area == 0 {
        return false;
    }
    let ratio = blob.bounding_box_area() as f32 / blob.area as f32;
    ratio > params.min_ratio && ratio < params.max_ratio && blob.area > params.min_area
}

/// Zero the whole bounding box of `blob` in `mask` (every channel).
pub fn erase_blob(mask: &mut Image, blob: &Blob) {
    let x_end = (blob.x + blob.width).min(mask.width());
    let y_end = (blob.y + blob.height).min(mask.height());
    for y in blob.y..y_end {
        for x in blob.x..x_end {
            mask.fill_pixel(x, y, 0);
        }
    }
}

/// Keep the circular blobs; erase the others from `mask`.
///
/// The erase covers the rejected blob's bounding rectangle, not just its own
/// pixels. Returns the accepted blobs in their original order; an empty list
/// means nothing survived.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(blobs, mask, params), fields(blobs = blobs.len()))
)]
pub fn filter_circular(blobs: Vec<Blob>, mask: &mut Image, params: &CircularityParams) -> Vec<Blob> {
    let total = blobs.len();
    let accepted: Vec<Blob> = blobs
        .into_iter()
        .filter(|blob| {
            let keep = is_circular(blob, params);
            if !keep {
                erase_blob(mask, blob);
            }
            keep
        })
        .collect();

    log::debug!("circularity filter kept {}/{} blobs", accepted.len(), total);
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(x: usize, y: usize, size: usize, area: usize) -> Blob {
        Blob {
            area,
            ..Blob::from_bounding_box(x, y, size, size)
        }
    }

    #[test]
    fn disc_like_blob_is_accepted_and_square_rejected() {
        let params = CircularityParams::default();
        let disc = blob(0, 0, 50, 1963);
        let square = blob(0, 0, 50, 2500);

        approx::assert_relative_eq!(
            disc.bounding_box_area() as f32 / disc.area as f32,
            1.2736,
            epsilon = 1e-3
        );
        assert!(is_circular(&disc, &params));
        assert!(!is_circular(&square, &params));
    }

    #[test]
    fn small_discs_are_rejected() {
        let params = CircularityParams::default();
        // 40x40 box with disc-like ratio, but only 1256 px
        assert!(!is_circular(&blob(0, 0, 40, 1256), &params));
        assert!(!is_circular(&Blob::default(), &params));
    }

    #[test]
    fn rejected_blobs_are_erased_by_bounding_box() {
        let mut mask = Image::new(120, 60, 1).expect("mask");
        mask.fill(255);

        let disc = blob(2, 2, 50, 1963);
        let square = blob(60, 2, 50, 2500);
        let kept = filter_circular(vec![disc, square], &mut mask, &CircularityParams::default());

        assert_eq!(kept, vec![disc]);
        assert_eq!(mask.get(60, 2, 0), 0);
        assert_eq!(mask.get(109, 51, 0), 0);
        assert_eq!(mask.get(110, 51, 0), 255);
        assert_eq!(mask.get(10, 10, 0), 255);
    }

    #[test]
    fn nothing_survives_gives_empty_list() {
        let mut mask = Image::new(60, 60, 3).expect("mask");
        mask.fill(255);
        let kept = filter_circular(
            vec![blob(0, 0, 50, 2500)],
            &mut mask,
            &CircularityParams::default(),
        );
        assert!(kept.is_empty());
        assert_eq!(mask.pixel(49, 49), &[0, 0, 0]);
        assert_eq!(mask.pixel(50, 50), &[255, 255, 255]);
    }
}
