//! Codec adapters for format-specific implementations.
//!
//! Each module provides a source and a sink adapter between the resource
//! traits and the format-specific codec crate.

#![cfg_attr(not(feature = "png"), allow(dead_code))]

#[cfg(feature = "jpeg")]
pub(crate) mod jpeg;

#[cfg(feature = "png")]
pub(crate) mod png;

#[cfg(feature = "tiff")]
pub(crate) mod tiff;

#[cfg(feature = "exr")]
pub(crate) mod exr;

use crate::{CodecError, EncodedFormat, ImageFormat};

/// Reject planar layouts; every backend here stores interleaved samples.
pub(crate) fn require_interleaved(
    encoded: EncodedFormat,
    format: &ImageFormat,
) -> Result<(), CodecError> {
    if format.is_interleaved() {
        Ok(())
    } else {
        Err(CodecError::layout(
            encoded,
            format!("planar images ({} planes)", format.planes),
        ))
    }
}

/// Copy native-endian 16-bit samples into big-endian byte order.
pub(crate) fn u16_ne_to_be(src: &[u8]) -> Vec<u8> {
    src.chunks_exact(2)
        .flat_map(|pair| u16::from_ne_bytes([pair[0], pair[1]]).to_be_bytes())
        .collect()
}

/// Write big-endian 16-bit samples into a native-endian destination.
pub(crate) fn u16_be_to_ne(src: &[u8], dst: &mut [u8]) {
    for (out, pair) in dst.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
        out.copy_from_slice(&u16::from_be_bytes([pair[0], pair[1]]).to_ne_bytes());
    }
}

/// Fail when a decoder produced a different amount of data than the header
/// promised.
pub(crate) fn check_decoded_len(
    encoded: EncodedFormat,
    format: &ImageFormat,
    expected: usize,
    actual: usize,
) -> Result<(), CodecError> {
    if expected == actual {
        return Ok(());
    }
    Err(CodecError::InvalidInput(format!(
        "{encoded} decoder produced {actual} bytes for {}x{} {:?}, expected {expected}",
        format.width, format.height, format.layout
    )))
}
