//! Decoded pixel layout descriptor.
//!
//! [`ImageFormat`] is exchanged at the resource boundary: sources report it
//! after parsing headers, sinks are created from it.

/// Channel storage type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum ChannelType {
    /// 8-bit unsigned integer (1 byte per channel).
    U8 = 1,
    /// 16-bit unsigned integer in native byte order (2 bytes per channel).
    U16 = 2,
    /// 32-bit floating point in native byte order (4 bytes per channel).
    F32 = 4,
}

impl ChannelType {
    /// Byte size of a single channel value.
    #[inline]
    pub const fn byte_size(self) -> usize {
        self as usize
    }
}

/// Channel layout (number and meaning of channels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum ChannelLayout {
    /// Single luminance channel.
    Gray = 1,
    /// Luminance + alpha.
    GrayAlpha = 2,
    /// Red, green, blue.
    Rgb = 3,
    /// Red, green, blue, alpha.
    Rgba = 4,
}

impl ChannelLayout {
    /// Number of channels in this layout.
    #[inline]
    pub const fn channels(self) -> usize {
        self as usize
    }

    /// Whether this layout includes an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba)
    }
}

/// Pixel layout of a decoded image.
///
/// `planes == 1` means channels are interleaved per pixel. A planar image
/// stores each channel in its own plane, so `planes == channels()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageFormat {
    pub width: u32,
    pub height: u32,
    pub planes: u32,
    pub layout: ChannelLayout,
    pub channel_type: ChannelType,
}

impl ImageFormat {
    /// Interleaved format.
    pub const fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        channel_type: ChannelType,
    ) -> Self {
        Self {
            width,
            height,
            planes: 1,
            layout,
            channel_type,
        }
    }

    /// Planar format with one plane per channel.
    pub const fn planar(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        channel_type: ChannelType,
    ) -> Self {
        Self {
            width,
            height,
            planes: layout.channels() as u32,
            layout,
            channel_type,
        }
    }

    #[inline]
    pub const fn channels(&self) -> usize {
        self.layout.channels()
    }

    #[inline]
    pub const fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    #[inline]
    pub const fn is_interleaved(&self) -> bool {
        self.planes <= 1
    }

    /// Bytes per pixel across all channels.
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.channels() * self.channel_type.byte_size()
    }

    /// Bytes in one interleaved row. `None` on overflow.
    pub fn row_bytes(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.bytes_per_pixel())
    }

    /// Total bytes for a tightly packed buffer. `None` on overflow.
    ///
    /// Planar and interleaved images of the same dimensions occupy the same
    /// number of bytes.
    pub fn buffer_size(&self) -> Option<usize> {
        self.row_bytes()?.checked_mul(self.height as usize)
    }

    /// Total pixel count (width x height).
    #[inline]
    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
