//! Coin counting over a sequence of video frames.
//!
//! This crate provides:
//! - re-exports of the pixel operations (`coin-counter-core`) and the blob
//!   stages (`coin-counter-blobs`)
//! - the denomination table, the cross-frame tracker and the running tally
//! - [`CoinCounter`], which runs one frame at a time through segmentation,
//!   morphology, labeling, the circularity filter and the tracker
//! - (feature `image`) adapters from `image::RgbImage`
//!
//! ## Quickstart
//!
//! ```
//! use coin_counter::{CoinCounter, CoinCounterParams};
//! use coin_counter::core::Image;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut counter = CoinCounter::new(64, 48, CoinCounterParams::default())?;
//! let frame = Image::new(64, 48, 3)?;
//! let report = counter.process_frame(&frame)?;
//! assert_eq!(report.tally.coins(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `coin_counter::core`: image buffer, HSV segmentation, morphology, drawing, logger.
//! - `coin_counter::blobs`: labeling, blob geometry, circularity filter.
//! - `coin_counter::detect` (feature `image`): frame conversion and loading.

pub use coin_counter_blobs as blobs;
pub use coin_counter_core as core;

mod denomination;
mod error;
mod params;
mod pipeline;
mod tally;
mod tracker;

pub use coin_counter_blobs::{Blob, CircularityParams};
pub use coin_counter_core::{HsvWindow, Image, ImageError};
pub use denomination::{identify_coin, CoinRule, Denomination, DENOMINATION_TABLE};
pub use error::PipelineError;
pub use params::{CoinCounterParams, MorphologyParams, SegmentationParams};
pub use pipeline::{CoinCounter, FrameReport};
pub use tally::CoinTally;
pub use tracker::{CoinTracker, CountingParams, TrackOutcome, TrackedBlob};

#[cfg(feature = "image")]
pub mod detect;
