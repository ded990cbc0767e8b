/// Errors returned by image construction and the pixel operations.
///
/// Every operation validates its inputs before touching the destination, so
/// an error always means nothing was written.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height}, channels={channels})")]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("row stride {stride} is smaller than width*channels = {min}")]
    StrideTooSmall { stride: usize, min: usize },

    #[error("invalid image buffer length (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("expected a {expected}-channel image, got {got} channels")]
    ChannelMismatch { expected: usize, got: usize },

    #[error("image geometry mismatch ({src_width}x{src_height} vs {dst_width}x{dst_height})")]
    GeometryMismatch {
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    },

    #[error("kernel size must be odd and >= 1, got {0}")]
    InvalidKernel(usize),
}
