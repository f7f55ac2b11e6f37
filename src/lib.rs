//! # memcodecs
//!
//! In-memory image resources with the codec chosen at runtime from a file
//! extension or MIME type.
//!
//! Two resource kinds are exposed:
//!
//! - a [`SourceResource`] wraps encoded bytes, reports the decoded
//!   [`ImageFormat`], and decodes into a caller buffer;
//! - a [`SinkResource`] accepts pixels matching an [`ImageFormat`] and
//!   produces encoded bytes.
//!
//! Each backend is feature-gated. Enable only what you need:
//!
//! ```toml
//! [dependencies]
//! memcodecs = { version = "0.1", default-features = false, features = ["jpeg", "png"] }
//! ```
//!
//! Identifiers from a backend that is not compiled in resolve to
//! [`CodecError::UnsupportedFormat`], same as identifiers nobody handles.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use memcodecs::{ChannelLayout, ChannelType, ImageFormat};
//!
//! let format = ImageFormat::new(64, 64, ChannelLayout::Rgb, ChannelType::U8);
//! let pixels = vec![0u8; format.buffer_size().unwrap()];
//!
//! let mut sink = memcodecs::create(".PNG", &format)?;
//! sink.write(&pixels)?;
//!
//! // Borrow the encoded bytes without copying them.
//! let source = memcodecs::open_slice("image/png", sink.data())?;
//! assert_eq!(source.format(), format);
//! let decoded = source.read_vec()?;
//! assert_eq!(decoded, pixels);
//! # Ok::<(), memcodecs::CodecError>(())
//! ```

#![forbid(unsafe_code)]

mod backend;
mod buffer;
mod codecs;
pub mod config;
mod dispatch;
mod error;
mod format;
mod identifier;
mod limits;
mod pixel;
mod registry;
mod resource;

pub use backend::supported_identifiers;
pub use buffer::SharedBuffer;
pub use config::CodecConfig;
pub use dispatch::{CreateRequest, OpenRequest, create, open, open_detected, open_slice};
pub use error::CodecError;
pub use format::EncodedFormat;
pub use identifier::normalize;
pub use limits::Limits;
pub use pixel::{ChannelLayout, ChannelType, ImageFormat};
pub use registry::CodecRegistry;
pub use resource::{SinkResource, SourceResource};
