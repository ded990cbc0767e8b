use coin_counter_core::ImageError;

/// Errors returned by the labeler.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("label image is {got_width}x{got_height}, mask is {width}x{height}")]
    LabelGeometry {
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
    },

    #[error("provisional label space exhausted")]
    LabelOverflow,
}
