//! Image buffer model and the fixed-parameter pixel operations of the coin
//! counter pipeline.
//!
//! Every operation reads one [`Image`] and writes another owned by the
//! caller. Inputs are validated up front; on error nothing is written.
//!
//! ## Quickstart
//!
//! ```
//! use coin_counter_core::{dilate, erode, rgb_to_hsv, segment_hsv, HsvWindow, Image};
//!
//! let frame = Image::from_raw(2, 1, 3, vec![100, 88, 50, 0, 0, 0]).unwrap();
//! let mut hsv = Image::new(2, 1, 3).unwrap();
//! rgb_to_hsv(&frame, &mut hsv).unwrap();
//!
//! let mut mask = Image::new(2, 1, 3).unwrap();
//! segment_hsv(&hsv, &mut mask, &HsvWindow::new((40, 60), (20, 80), (15, 55))).unwrap();
//! assert_eq!(mask.pixel(0, 0), &[255, 255, 255]);
//!
//! let mut closed = Image::new(2, 1, 3).unwrap();
//! dilate(&mask, &mut closed, 3).unwrap();
//! erode(&closed, &mut mask, 3).unwrap();
//! ```

mod channel;
mod color;
mod draw;
mod error;
mod image;
mod logger;
mod median;
mod morphology;

pub use channel::{to_single_channel, to_triple_channel};
pub use color::{convert_channel_order, hsv_from_rgb, rgb_to_hsv, segment_hsv, union_into, HsvWindow};
pub use draw::{
    draw_cross, draw_edges, draw_rect_outline, prewitt_edges, BOX_COLOR, CENTROID_COLOR,
    EDGE_COLOR,
};
pub use error::ImageError;
pub use image::{Image, MAX_LEVEL};
pub use median::median_blur;
pub use morphology::{dilate, erode};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
