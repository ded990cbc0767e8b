//! Blob extraction for the coin counter: connected-component labeling,
//! per-blob geometry and the circularity filter.
//!
//! Blob lists are handed from stage to stage by value:
//!
//! ```
//! use coin_counter_blobs::{compute_blob_info, filter_circular, label_blobs, CircularityParams, LabelImage};
//! use coin_counter_core::Image;
//!
//! let mut mask = Image::new(16, 16, 1).unwrap();
//! for y in 4..8 {
//!     for x in 4..8 {
//!         mask.set(x, y, 0, 255);
//!     }
//! }
//!
//! let mut labels = LabelImage::for_mask(&mask);
//! let blobs = label_blobs(&mask, &mut labels).unwrap();
//! let blobs = compute_blob_info(&labels, blobs);
//! assert_eq!(blobs[0].area, 16);
//!
//! // a filled square is not a coin
//! let coins = filter_circular(blobs, &mut mask, &CircularityParams::default());
//! assert!(coins.is_empty());
//! ```

mod analyze;
mod annotate;
mod blob;
mod error;
mod filter;
mod label;

pub use analyze::{compute_blob_info, estimate_perimeter};
pub use annotate::{draw_bounding_boxes, draw_centroids, BOX_INSET, CENTROID_MARK_HALF};
pub use blob::Blob;
pub use error::BlobError;
pub use filter::{erase_blob, filter_circular, is_circular, CircularityParams};
pub use label::{label_blobs, LabelImage};
