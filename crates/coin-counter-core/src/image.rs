use crate::error::ImageError;

/// Largest intensity a pixel channel can hold.
pub const MAX_LEVEL: u8 = 255;

/// Owned 8-bit image with interleaved channels and an explicit row stride.
///
/// Invariants, checked at construction:
/// - `width > 0`, `height > 0`, `channels` is 1 or 3,
/// - `stride >= width * channels`,
/// - `data.len() == stride * height`.
///
/// Pixel `(x, y)` channel `c` lives at `y * stride + x * channels + c`; every
/// stage addresses pixels through [`Image::offset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
    max_level: u8,
    data: Vec<u8>,
}

impl Image {
    /// Allocate a zeroed image with a tight stride (`width * channels`).
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, ImageError> {
        Self::with_stride(width, height, channels, width.saturating_mul(channels))
    }

    /// Allocate a zeroed image with a padded row stride.
    pub fn with_stride(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> Result<Self, ImageError> {
        let len = validate_geometry(width, height, channels, stride)?;
        Ok(Self {
            width,
            height,
            channels,
            stride,
            max_level: MAX_LEVEL,
            data: vec![0; len],
        })
    }

    /// Wrap an existing tightly packed buffer.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        Self::from_raw_with_stride(width, height, channels, width.saturating_mul(channels), data)
    }

    /// Wrap an existing buffer whose rows are `stride` bytes apart.
    pub fn from_raw_with_stride(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = validate_geometry(width, height, channels, stride)?;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            stride,
            max_level: MAX_LEVEL,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Bytes per row, including any padding.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of channel `channel` of pixel `(x, y)`.
    ///
    /// Panics when the coordinate lies outside the image, so a column past
    /// the right edge never aliases into the next row.
    #[inline]
    pub fn offset(&self, x: usize, y: usize, channel: usize) -> usize {
        assert!(
            x < self.width && y < self.height && channel < self.channels,
            "pixel ({x}, {y}, {channel}) outside {}x{}x{}",
            self.width,
            self.height,
            self.channels
        );
        y * self.stride + x * self.channels + channel
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> u8 {
        self.data[self.offset(x, y, channel)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: usize, value: u8) {
        let idx = self.offset(x, y, channel);
        self.data[idx] = value;
    }

    /// All channels of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = self.offset(x, y, 0);
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = self.offset(x, y, 0);
        &mut self.data[start..start + self.channels]
    }

    /// Write `value` into every channel of pixel `(x, y)`.
    #[inline]
    pub fn fill_pixel(&mut self, x: usize, y: usize, value: u8) {
        self.pixel_mut(x, y).fill(value);
    }

    /// Write a 3-component color into pixel `(x, y)` of a 3-channel image.
    #[inline]
    pub fn put_color(&mut self, x: usize, y: usize, color: [u8; 3]) {
        self.pixel_mut(x, y).copy_from_slice(&color);
    }

    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    /// Overwrite the pixels of `self` with those of `src` without
    /// reallocating. Strides may differ; width, height and channels may not.
    pub fn copy_from(&mut self, src: &Image) -> Result<(), ImageError> {
        self.require_channels(src.channels)?;
        src.require_same_size(self)?;
        let row = self.width * self.channels;
        for y in 0..self.height {
            let s = y * src.stride;
            let d = y * self.stride;
            self.data[d..d + row].copy_from_slice(&src.data[s..s + row]);
        }
        Ok(())
    }

    /// Same width and height (channel count and stride may differ).
    pub fn same_size(&self, other: &Image) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub(crate) fn require_channels(&self, expected: usize) -> Result<(), ImageError> {
        if self.channels != expected {
            return Err(ImageError::ChannelMismatch {
                expected,
                got: self.channels,
            });
        }
        Ok(())
    }

    pub(crate) fn require_same_size(&self, dst: &Image) -> Result<(), ImageError> {
        if !self.same_size(dst) {
            return Err(ImageError::GeometryMismatch {
                src_width: self.width,
                src_height: self.height,
                dst_width: dst.width,
                dst_height: dst.height,
            });
        }
        Ok(())
    }
}

fn validate_geometry(
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
) -> Result<usize, ImageError> {
    if width == 0 || height == 0 || !(channels == 1 || channels == 3) {
        return Err(ImageError::InvalidDimensions {
            width,
            height,
            channels,
        });
    }
    let min = width
        .checked_mul(channels)
        .ok_or(ImageError::InvalidDimensions {
            width,
            height,
            channels,
        })?;
    if stride < min {
        return Err(ImageError::StrideTooSmall { stride, min });
    }
    stride
        .checked_mul(height)
        .ok_or(ImageError::InvalidDimensions {
            width,
            height,
            channels,
        })
}
