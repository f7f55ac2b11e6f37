//! Unified error type for dispatch and backend operations.

use crate::format::EncodedFormat;

/// Boxed error raised by an underlying codec crate.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for codec operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// No compiled-in backend accepts the (normalized) identifier.
    #[error("format not implemented: {0}")]
    UnsupportedFormat(String),
    /// Format not recognized from magic bytes.
    #[error("unrecognized image format")]
    UnrecognizedFormat,
    /// Backend compiled in but disabled in the supplied registry.
    #[error("format {0} is disabled in the codec registry")]
    DisabledFormat(EncodedFormat),
    /// Backend cannot represent the requested pixel layout.
    #[error("{format} cannot encode {detail}")]
    UnsupportedLayout {
        format: EncodedFormat,
        detail: String,
    },
    /// Input validation failed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Pixel buffer does not match the resource's format.
    #[error("pixel buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    /// Resource limit exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    /// Underlying codec error.
    #[error("codec error ({format}): {source}")]
    Codec {
        format: EncodedFormat,
        source: BoxedError,
    },
}

// Conversion helpers for codec-specific errors
impl CodecError {
    /// Wrap a codec-specific error.
    pub fn from_codec<E>(format: EncodedFormat, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CodecError::Codec {
            format,
            source: Box::new(error),
        }
    }

    /// Wrap a codec error that only exposes `Display`.
    pub(crate) fn from_codec_message(
        format: EncodedFormat,
        error: impl core::fmt::Display,
    ) -> Self {
        CodecError::Codec {
            format,
            source: BoxedError::from(error.to_string()),
        }
    }

    pub(crate) fn layout(format: EncodedFormat, detail: impl Into<String>) -> Self {
        CodecError::UnsupportedLayout {
            format,
            detail: detail.into(),
        }
    }

    /// Whether the dispatcher rejected the identifier itself, as opposed to a
    /// backend failing after selection.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CodecError::UnsupportedFormat(_))
    }
}
