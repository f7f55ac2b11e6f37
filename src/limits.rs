//! Resource limits.

use crate::{CodecError, ImageFormat};

/// Resource limits for open/create operations.
///
/// Used to prevent DoS attacks and resource exhaustion. All limits are optional.
/// Sources check them against parsed header dimensions before any pixel is
/// decoded; sinks check them against the requested format.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u64>,
    /// Maximum image height in pixels.
    pub max_height: Option<u64>,
    /// Maximum total pixels (width x height).
    pub max_pixels: Option<u64>,
    /// Maximum decoded buffer size in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Create a new Limits with no restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if dimensions are within limits.
    ///
    /// Returns `Err` with a description if any limit is exceeded.
    pub fn check_dimensions(&self, width: u64, height: u64) -> Result<(), &'static str> {
        if let Some(max_width) = self.max_width {
            if width > max_width {
                return Err("width exceeds limit");
            }
        }

        if let Some(max_height) = self.max_height {
            if height > max_height {
                return Err("height exceeds limit");
            }
        }

        if let Some(max_pixels) = self.max_pixels {
            let pixels = width.saturating_mul(height);
            if pixels > max_pixels {
                return Err("pixel count exceeds limit");
            }
        }

        Ok(())
    }

    /// Check if a memory allocation is within limits.
    pub fn check_memory(&self, bytes: u64) -> Result<(), &'static str> {
        if let Some(max_memory) = self.max_memory_bytes {
            if bytes > max_memory {
                return Err("memory allocation exceeds limit");
            }
        }
        Ok(())
    }

    /// Check a pixel format against every limit.
    pub fn validate(&self, format: &ImageFormat) -> Result<(), CodecError> {
        self.check_dimensions(u64::from(format.width), u64::from(format.height))
            .map_err(|msg| CodecError::LimitExceeded(msg.into()))?;

        let bytes = format
            .pixel_count()
            .saturating_mul(format.bytes_per_pixel() as u64);
        self.check_memory(bytes)
            .map_err(|msg| CodecError::LimitExceeded(msg.into()))
    }
}
