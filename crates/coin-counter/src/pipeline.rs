//! Per-frame coin counting pipeline.

use serde::Serialize;

use coin_counter_blobs::{
    compute_blob_info, draw_bounding_boxes, draw_centroids, filter_circular, label_blobs, Blob,
    LabelImage,
};
use coin_counter_core::{
    convert_channel_order, dilate, draw_edges, erode, median_blur, prewitt_edges, rgb_to_hsv,
    segment_hsv, to_single_channel, union_into, Image,
};

use crate::error::PipelineError;
use crate::params::CoinCounterParams;
use crate::tally::CoinTally;
use crate::tracker::{CoinTracker, TrackOutcome, TrackedBlob};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Result of one [`CoinCounter::process_frame`] call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    /// Zero-based index of the frame in the sequence since the last reset.
    pub frame_index: usize,
    /// Circular blobs found in the frame, band or not.
    pub blobs: Vec<Blob>,
    /// Tracking decision for every blob inside the counting band.
    pub tracked: Vec<TrackedBlob>,
    /// Coins added to the tally by this frame.
    pub newly_counted: usize,
    /// Running tally after this frame.
    pub tally: CoinTally,
}

/// Counts coins across a sequence of equally sized frames.
///
/// All scratch images are allocated once in [`CoinCounter::new`]; frames are
/// expected in capture (BGR) order.
#[derive(Debug)]
pub struct CoinCounter {
    params: CoinCounterParams,
    width: usize,
    height: usize,
    canvas: Image,
    work: Image,
    hsv: Image,
    window_mask: Image,
    mask: Image,
    closed: Image,
    gray_mask: Image,
    edges: Image,
    labels: LabelImage,
    tracker: CoinTracker,
    tally: CoinTally,
    frame_index: usize,
}

impl CoinCounter {
    pub fn new(width: usize, height: usize, params: CoinCounterParams) -> Result<Self, PipelineError> {
        params.validate()?;
        let rgb = || Image::new(width, height, 3);
        let gray = || Image::new(width, height, 1);
        Ok(Self {
            canvas: rgb()?,
            work: rgb()?,
            hsv: rgb()?,
            window_mask: rgb()?,
            mask: rgb()?,
            closed: rgb()?,
            gray_mask: gray()?,
            edges: gray()?,
            labels: LabelImage::new(width, height),
            tracker: CoinTracker::new(params.counting),
            tally: CoinTally::new(),
            frame_index: 0,
            params,
            width,
            height,
        })
    }

    pub fn params(&self) -> &CoinCounterParams {
        &self.params
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Prefiltered copy of the last frame with the overlays drawn on it, in
    /// capture order.
    pub fn canvas(&self) -> &Image {
        &self.canvas
    }

    pub fn tally(&self) -> &CoinTally {
        &self.tally
    }

    pub fn tracker(&self) -> &CoinTracker {
        &self.tracker
    }

    /// Forget the previous frame and zero the tally.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.tally.clear();
        self.frame_index = 0;
    }

    /// Run one frame through the pipeline and update the tally.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(frame = self.frame_index))
    )]
    pub fn process_frame(&mut self, frame: &Image) -> Result<FrameReport, PipelineError> {
        if frame.channels() != 3 || frame.width() != self.width || frame.height() != self.height {
            return Err(PipelineError::FrameGeometry {
                width: self.width,
                height: self.height,
                got_width: frame.width(),
                got_height: frame.height(),
                got_channels: frame.channels(),
            });
        }

        match self.params.median_kernel {
            Some(kernel) => median_blur(frame, &mut self.canvas, kernel)?,
            None => self.canvas.copy_from(frame)?,
        }

        self.segment()?;
        let blobs = self.detect();

        if self.params.annotate && !blobs.is_empty() {
            self.annotate(&blobs)?;
        }

        Ok(self.finish_frame(blobs))
    }

    /// Account for a frame that could not be read or processed as a frame
    /// with no detections: the tracker forgets the previous frame and the
    /// frame index advances. The canvas keeps its last contents.
    pub fn skip_frame(&mut self) -> FrameReport {
        log::debug!("frame {}: skipped, treated as empty", self.frame_index);
        self.finish_frame(Vec::new())
    }

    fn finish_frame(&mut self, blobs: Vec<Blob>) -> FrameReport {
        let tracked = self.tracker.update(&blobs, self.height);
        let mut newly_counted = 0;
        for entry in &tracked {
            if let TrackOutcome::Counted { denomination } = entry.outcome {
                log::info!(
                    "frame {}: counted {:?} at ({}, {})",
                    self.frame_index,
                    denomination,
                    entry.blob.xc,
                    entry.blob.yc
                );
                self.tally.record(denomination);
                newly_counted += 1;
            }
        }

        let report = FrameReport {
            frame_index: self.frame_index,
            blobs,
            tracked,
            newly_counted,
            tally: self.tally.clone(),
        };
        self.frame_index += 1;
        report
    }

    /// Prefiltered canvas -> closed single-channel coin mask in `gray_mask`.
    fn segment(&mut self) -> Result<(), PipelineError> {
        self.work.copy_from(&self.canvas)?;
        convert_channel_order(&mut self.work)?;
        rgb_to_hsv(&self.work, &mut self.hsv)?;

        self.mask.fill(0);
        for window in &self.params.segmentation.windows {
            segment_hsv(&self.hsv, &mut self.window_mask, window)?;
            union_into(&self.window_mask, &mut self.mask)?;
        }

        let kernel = self.params.morphology.kernel;
        dilate(&self.mask, &mut self.closed, kernel)?;
        erode(&self.closed, &mut self.mask, kernel)?;
        to_single_channel(&self.mask, &mut self.gray_mask)?;
        Ok(())
    }

    /// Label the coin mask and keep the circular blobs. Rejected blobs are
    /// erased from `gray_mask`.
    fn detect(&mut self) -> Vec<Blob> {
        let blobs = match label_blobs(&self.gray_mask, &mut self.labels) {
            Ok(blobs) => blobs,
            Err(err) => {
                log::warn!("frame {}: labeling failed: {err}", self.frame_index);
                return Vec::new();
            }
        };
        if blobs.is_empty() {
            return blobs;
        }

        let blobs = compute_blob_info(&self.labels, blobs);
        let labeled = blobs.len();
        let blobs = filter_circular(blobs, &mut self.gray_mask, &self.params.circularity);
        log::debug!(
            "frame {}: {} blobs labeled, {} circular",
            self.frame_index,
            labeled,
            blobs.len()
        );
        blobs
    }

    fn annotate(&mut self, blobs: &[Blob]) -> Result<(), PipelineError> {
        draw_bounding_boxes(&mut self.canvas, blobs)?;
        prewitt_edges(&self.gray_mask, &mut self.edges)?;
        draw_edges(&self.edges, &mut self.canvas)?;
        draw_centroids(&mut self.canvas, blobs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_frames_of_another_size() {
        let mut counter = CoinCounter::new(20, 10, CoinCounterParams::default()).expect("counter");
        let frame = Image::new(10, 10, 3).expect("frame");
        assert!(matches!(
            counter.process_frame(&frame),
            Err(PipelineError::FrameGeometry { got_width: 10, .. })
        ));
        let gray = Image::new(20, 10, 1).expect("gray");
        assert!(counter.process_frame(&gray).is_err());
    }

    #[test]
    fn invalid_params_are_rejected_up_front() {
        let mut params = CoinCounterParams::default();
        params.median_kernel = Some(2);
        assert!(matches!(
            CoinCounter::new(20, 10, params),
            Err(PipelineError::InvalidParams(_))
        ));
        assert!(matches!(
            CoinCounter::new(0, 10, CoinCounterParams::default()),
            Err(PipelineError::Image(_))
        ));
    }

    #[test]
    fn blank_frames_count_nothing() {
        let mut counter = CoinCounter::new(32, 24, CoinCounterParams::default()).expect("counter");
        let frame = Image::new(32, 24, 3).expect("frame");
        for i in 0..3 {
            let report = counter.process_frame(&frame).expect("frame");
            assert_eq!(report.frame_index, i);
            assert!(report.blobs.is_empty());
            assert_eq!(report.newly_counted, 0);
        }
        assert_eq!(counter.tally().coins(), 0);
        assert_eq!(counter.canvas(), &frame);

        counter.reset();
        let report = counter.process_frame(&frame).expect("frame");
        assert_eq!(report.frame_index, 0);
    }
}
