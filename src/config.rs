//! Format-specific codec configuration and re-exports.
//!
//! Each backend's configuration types are re-exported behind feature gates.
//! The [`CodecConfig`] struct bundles all format-specific overrides into a
//! single value that can be passed to open/create requests.

/// PNG configuration types from the png crate.
#[cfg(feature = "png")]
pub mod png_codec {
    pub use png::{Compression, Filter};
}

/// Default JPEG quality when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Format-specific configuration overrides.
///
/// Fields left as `None` fall back to the backend's defaults.
///
/// # Example
///
/// ```
/// use memcodecs::{ChannelLayout, ChannelType, CodecConfig, CreateRequest, ImageFormat};
///
/// let config = CodecConfig::default().with_jpeg_quality(75);
/// let format = ImageFormat::new(8, 8, ChannelLayout::Rgb, ChannelType::U8);
/// let sink = CreateRequest::new("jpg").with_codec_config(&config).create(&format);
/// # let _ = sink;
/// ```
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct CodecConfig {
    /// JPEG encoder quality, 1-100.
    pub jpeg_quality: Option<u8>,

    /// PNG compression level.
    #[cfg(feature = "png")]
    pub png_compression: Option<png::Compression>,

    /// PNG filter strategy.
    #[cfg(feature = "png")]
    pub png_filter: Option<png::Filter>,
}

impl CodecConfig {
    /// Set JPEG encoder quality (clamped to 1-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.clamp(1, 100));
        self
    }

    /// Set PNG compression level.
    #[cfg(feature = "png")]
    pub fn with_png_compression(mut self, compression: png::Compression) -> Self {
        self.png_compression = Some(compression);
        self
    }

    /// Set PNG filter strategy.
    #[cfg(feature = "png")]
    pub fn with_png_filter(mut self, filter: png::Filter) -> Self {
        self.png_filter = Some(filter);
        self
    }

    /// Effective JPEG quality.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY)
    }
}
