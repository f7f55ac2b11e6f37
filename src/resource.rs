//! Source and sink resource contracts.
//!
//! Every backend provides one adapter per direction. The dispatcher hands
//! them out as trait objects, so callers never name a backend type.

use crate::{CodecError, EncodedFormat, ImageFormat};

/// Readable in-memory encoded image.
///
/// Headers are parsed when the resource is opened, so [`format`] is known
/// up front. Decoding happens on each [`read`] call.
///
/// [`format`]: SourceResource::format
/// [`read`]: SourceResource::read
pub trait SourceResource: Send + Sync {
    /// Backend bound to this resource.
    fn encoded_format(&self) -> EncodedFormat;

    /// Pixel layout produced by [`read`](SourceResource::read).
    fn format(&self) -> ImageFormat;

    /// Encoded bytes this resource decodes from.
    fn data(&self) -> &[u8];

    /// Decode into `dst`, which must be exactly
    /// `format().buffer_size()` bytes of tightly packed interleaved samples.
    fn read(&self, dst: &mut [u8]) -> Result<(), CodecError>;

    /// Decode into a freshly allocated buffer.
    fn read_vec(&self) -> Result<Vec<u8>, CodecError> {
        let size = buffer_size(&self.format())?;
        let mut pixels = vec![0u8; size];
        self.read(&mut pixels)?;
        Ok(pixels)
    }
}

/// Writable in-memory encoded image.
pub trait SinkResource: Send {
    /// Backend bound to this resource.
    fn encoded_format(&self) -> EncodedFormat;

    /// Pixel layout accepted by [`write`](SinkResource::write).
    fn format(&self) -> ImageFormat;

    /// Encode one full image. `pixels` must be exactly
    /// `format().buffer_size()` bytes. Replaces any previous output.
    fn write(&mut self, pixels: &[u8]) -> Result<(), CodecError>;

    /// Encoded bytes. Empty until the first successful write.
    fn data(&self) -> &[u8];

    /// Take the encoded bytes, consuming the resource.
    fn into_data(self: Box<Self>) -> Vec<u8>;
}

/// Buffer size for a format, failing on overflow.
pub(crate) fn buffer_size(format: &ImageFormat) -> Result<usize, CodecError> {
    format
        .buffer_size()
        .ok_or_else(|| CodecError::InvalidInput(format!("{format:?} overflows usize")))
}

/// Require `buf` to hold exactly one image of `format`.
pub(crate) fn check_buffer(format: &ImageFormat, buf: &[u8]) -> Result<(), CodecError> {
    let expected = buffer_size(format)?;
    if buf.len() != expected {
        return Err(CodecError::BufferSize {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}
