//! Cross-frame de-duplication of coins passing the counting band.
//!
//! A coin is counted on the first frame its centroid enters the band. On the
//! next frames it still overlaps its own bounding box from the frame before,
//! which marks it as already counted. Only the previous frame is remembered.

use serde::{Deserialize, Serialize};

use coin_counter_blobs::Blob;

use crate::denomination::Denomination;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Counting band placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingParams {
    /// Half height of the band centered on the middle row, in pixels.
    pub band_half_height: usize,
}

impl Default for CountingParams {
    fn default() -> Self {
        Self {
            band_half_height: 20,
        }
    }
}

/// What the tracker decided for one in-band blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackOutcome {
    /// New coin, identified and added to the tally.
    Counted { denomination: Denomination },
    /// New blob whose geometry matches no denomination.
    Unrecognized,
    /// Overlaps a blob of the previous frame.
    AlreadyCounted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedBlob {
    pub blob: Blob,
    pub outcome: TrackOutcome,
}

#[derive(Clone, Debug, Default)]
pub struct CoinTracker {
    params: CountingParams,
    previous: Vec<Blob>,
}

impl CoinTracker {
    pub fn new(params: CountingParams) -> Self {
        Self {
            params,
            previous: Vec::new(),
        }
    }

    /// Tracker that remembers `previous` as the in-band blobs of the last frame.
    pub fn with_previous(params: CountingParams, previous: Vec<Blob>) -> Self {
        Self { params, previous }
    }

    pub fn params(&self) -> &CountingParams {
        &self.params
    }

    /// In-band blobs of the last processed frame.
    pub fn previous(&self) -> &[Blob] {
        &self.previous
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }

    /// Whether the centroid row of `blob` lies inside the band (bounds inclusive).
    pub fn in_band(&self, blob: &Blob, frame_height: usize) -> bool {
        let center = (frame_height / 2) as i64;
        let half = self.params.band_half_height as i64;
        let yc = blob.yc as i64;
        yc >= center - half && yc <= center + half
    }

    /// Classify the in-band blobs of one frame and remember them for the next.
    ///
    /// Blobs outside the band produce no entry. The remembered list is
    /// replaced even when `blobs` is empty.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, blobs), fields(blobs = blobs.len()))
    )]
    pub fn update(&mut self, blobs: &[Blob], frame_height: usize) -> Vec<TrackedBlob> {
        let current: Vec<Blob> = blobs
            .iter()
            .filter(|blob| self.in_band(blob, frame_height))
            .copied()
            .collect();

        let tracked = current
            .iter()
            .map(|blob| {
                let outcome = if self.previous.iter().any(|prev| blob.overlaps(prev)) {
                    TrackOutcome::AlreadyCounted
                } else {
                    match Denomination::classify(blob.area, blob.perimeter) {
                        Some(denomination) => TrackOutcome::Counted { denomination },
                        None => TrackOutcome::Unrecognized,
                    }
                };
                log::trace!(
                    "blob {} at ({}, {}) area {} perimeter {}: {:?}",
                    blob.label,
                    blob.xc,
                    blob.yc,
                    blob.area,
                    blob.perimeter,
                    outcome
                );
                TrackedBlob {
                    blob: *blob,
                    outcome,
                }
            })
            .collect();

        self.previous = current;
        tracked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: usize = 50;

    fn coin(x: usize, y: usize, w: usize, h: usize, area: usize, perimeter: usize) -> Blob {
        Blob {
            area,
            perimeter,
            ..Blob::from_bounding_box(x, y, w, h)
        }
    }

    fn tracker_with(previous: Vec<Blob>) -> CoinTracker {
        // band spans the whole test frame
        CoinTracker::with_previous(CountingParams { band_half_height: 200 }, previous)
    }

    #[test]
    fn overlapping_blob_is_already_counted() {
        let mut tracker = tracker_with(vec![coin(10, 10, 20, 20, 25000, 575)]);
        let tracked = tracker.update(&[coin(15, 15, 20, 20, 25000, 575)], HEIGHT);
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].outcome, TrackOutcome::AlreadyCounted);
    }

    #[test]
    fn disjoint_blob_is_counted() {
        let mut tracker = tracker_with(vec![coin(10, 10, 20, 20, 25000, 575)]);
        let tracked = tracker.update(&[coin(100, 100, 20, 20, 25000, 575)], HEIGHT);
        assert_eq!(
            tracked[0].outcome,
            TrackOutcome::Counted {
                denomination: Denomination::FiftyCents
            }
        );
    }

    #[test]
    fn every_previous_entry_is_checked() {
        let previous = vec![coin(0, 0, 5, 5, 0, 0), coin(200, 200, 30, 30, 0, 0)];
        let mut tracker = tracker_with(previous);
        let tracked = tracker.update(
            &[coin(10, 10, 5, 5, 5000, 0), coin(210, 210, 30, 30, 5000, 0)],
            HEIGHT,
        );
        assert_eq!(
            tracked[0].outcome,
            TrackOutcome::Counted {
                denomination: Denomination::OneCent
            }
        );
        assert_eq!(tracked[1].outcome, TrackOutcome::AlreadyCounted);
    }

    #[test]
    fn unmatched_geometry_is_unrecognized() {
        let mut tracker = tracker_with(Vec::new());
        let tracked = tracker.update(&[coin(0, 0, 10, 10, 13000, 0)], HEIGHT);
        assert_eq!(tracked[0].outcome, TrackOutcome::Unrecognized);
        assert_eq!(tracker.previous().len(), 1);
    }

    #[test]
    fn band_limits_are_inclusive() {
        let tracker = CoinTracker::new(CountingParams::default());
        // frame height 101: middle row 50, band 30..=70
        let at = |yc: usize| Blob {
            yc,
            ..Blob::default()
        };
        assert!(tracker.in_band(&at(30), 101));
        assert!(tracker.in_band(&at(70), 101));
        assert!(!tracker.in_band(&at(29), 101));
        assert!(!tracker.in_band(&at(71), 101));
        // band may reach above the first row
        assert!(tracker.in_band(&at(0), 30));
    }

    #[test]
    fn out_of_band_blobs_are_ignored_and_forgotten() {
        let mut tracker = CoinTracker::new(CountingParams::default());
        let outside = coin(0, 0, 10, 10, 5000, 0);
        assert!(tracker.update(&[outside], 200).is_empty());
        assert!(tracker.previous().is_empty());
    }

    #[test]
    fn empty_frame_clears_memory() {
        let mut tracker = tracker_with(vec![coin(10, 10, 20, 20, 5000, 0)]);
        assert!(tracker.update(&[], HEIGHT).is_empty());
        assert!(tracker.previous().is_empty());

        let tracked = tracker.update(&[coin(10, 10, 20, 20, 5000, 0)], HEIGHT);
        assert!(matches!(tracked[0].outcome, TrackOutcome::Counted { .. }));
    }
}
