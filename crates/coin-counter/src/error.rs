use coin_counter_core::ImageError;

/// Errors returned by [`CoinCounter`](crate::CoinCounter).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(
        "frame is {got_width}x{got_height}x{got_channels}, counter expects {width}x{height}x3"
    )]
    FrameGeometry {
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
        got_channels: usize,
    },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}
