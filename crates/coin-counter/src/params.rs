//! Pipeline configuration.
//!
//! Every section defaults to the constants the denomination table was tuned
//! with, and every field may be omitted from a JSON config.

use serde::{Deserialize, Serialize};

use coin_counter_blobs::CircularityParams;
use coin_counter_core::HsvWindow;

use crate::error::PipelineError;
use crate::tracker::CountingParams;

/// HSV windows whose masks are OR-ed into the coin mask.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationParams {
    pub windows: Vec<HsvWindow>,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            windows: vec![
                HsvWindow::new((40, 60), (20, 80), (15, 55)),
                HsvWindow::new((19, 38), (37, 82), (13, 47)),
                HsvWindow::new((40, 200), (4, 24), (15, 50)),
            ],
        }
    }
}

/// Closing applied to the coin mask: dilate, then erode, same kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyParams {
    pub kernel: usize,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self { kernel: 3 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinCounterParams {
    /// Median prefilter kernel; `None` skips the prefilter.
    pub median_kernel: Option<usize>,
    pub segmentation: SegmentationParams,
    pub morphology: MorphologyParams,
    pub circularity: CircularityParams,
    pub counting: CountingParams,
    /// Draw edges, boxes and centroids on the output canvas.
    pub annotate: bool,
}

impl Default for CoinCounterParams {
    fn default() -> Self {
        Self {
            median_kernel: Some(5),
            segmentation: SegmentationParams::default(),
            morphology: MorphologyParams::default(),
            circularity: CircularityParams::default(),
            counting: CountingParams::default(),
            annotate: true,
        }
    }
}

impl CoinCounterParams {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if let Some(k) = self.median_kernel {
            check_kernel("median_kernel", k)?;
        }
        check_kernel("morphology.kernel", self.morphology.kernel)?;
        if self.segmentation.windows.is_empty() {
            return Err(PipelineError::InvalidParams(
                "segmentation.windows must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_kernel(name: &str, k: usize) -> Result<(), PipelineError> {
    if k == 0 || k % 2 == 0 {
        return Err(PipelineError::InvalidParams(format!(
            "{name} must be odd and >= 1, got {k}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: CoinCounterParams =
            serde_json::from_str(r#"{"median_kernel": null, "morphology": {}}"#).expect("json");
        assert_eq!(params.median_kernel, None);
        assert_eq!(params.morphology.kernel, 3);
        assert_eq!(params.segmentation.windows.len(), 3);
        assert_eq!(params.counting.band_half_height, 20);
        assert!(params.annotate);
        params.validate().expect("valid");
    }

    #[test]
    fn rejects_even_kernels_and_empty_windows() {
        let mut params = CoinCounterParams::default();
        params.morphology.kernel = 4;
        assert!(matches!(
            params.validate(),
            Err(PipelineError::InvalidParams(_))
        ));

        let mut params = CoinCounterParams::default();
        params.median_kernel = Some(0);
        assert!(params.validate().is_err());

        let mut params = CoinCounterParams::default();
        params.segmentation.windows.clear();
        assert!(params.validate().is_err());
    }
}
