//! Identifier-driven open/create dispatch.
//!
//! Both directions run the same two steps: normalize the identifier, then
//! take the first compiled-in backend that accepts it. No match is
//! [`CodecError::UnsupportedFormat`]; errors raised by the selected backend
//! pass through untouched.

use crate::backend::{self, Backend, BackendOptions};
use crate::{
    CodecConfig, CodecError, CodecRegistry, EncodedFormat, ImageFormat, Limits, SharedBuffer,
    SinkResource, SourceResource, normalize,
};

/// Open encoded bytes for reading.
///
/// `len` is the number of leading bytes of `data` the backend may read. It
/// is handed to the backend as-is.
///
/// # Example
///
/// ```no_run
/// let bytes: Vec<u8> = std::fs::read("photo.jpg")?;
/// let source = memcodecs::open("image/jpeg", bytes.clone(), bytes.len())?;
/// let pixels = source.read_vec()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open<'a>(
    identifier: &str,
    data: impl Into<SharedBuffer<'a>>,
    len: usize,
) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
    OpenRequest::new(identifier).open(data, len)
}

/// Open caller-owned bytes for reading without taking ownership.
///
/// The returned resource borrows `data` and cannot outlive it.
pub fn open_slice<'a>(
    identifier: &str,
    data: &'a [u8],
) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
    OpenRequest::new(identifier).open(SharedBuffer::borrowed(data), data.len())
}

/// Open encoded bytes, picking the backend from magic bytes.
///
/// Use [`OpenRequest::detected`] to apply limits or a registry.
pub fn open_detected<'a>(
    data: impl Into<SharedBuffer<'a>>,
) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
    let data: SharedBuffer<'a> = data.into();
    let len = data.len();
    OpenRequest::detected().open(data, len)
}

/// Create a sink that encodes pixels of `format`.
pub fn create(identifier: &str, format: &ImageFormat) -> Result<Box<dyn SinkResource>, CodecError> {
    CreateRequest::new(identifier).create(format)
}

/// Normalize and look up a backend.
fn resolve(identifier: &str) -> Result<&'static Backend, CodecError> {
    let normalized = normalize(identifier);
    match backend::find(&normalized) {
        Some(backend) => {
            log::trace!("identifier {identifier:?} -> {}", backend.format);
            Ok(backend)
        }
        None => {
            log::debug!("no backend for identifier {normalized:?}");
            Err(CodecError::UnsupportedFormat(normalized.into_owned()))
        }
    }
}

/// Detect the family from leading bytes and look up its backend.
fn resolve_detected(data: &[u8]) -> Result<&'static Backend, CodecError> {
    let format = EncodedFormat::detect(data).ok_or(CodecError::UnrecognizedFormat)?;
    match backend::for_format(format) {
        Some(backend) => {
            log::debug!("detected {format} from magic bytes");
            Ok(backend)
        }
        None => {
            log::debug!("detected {format}, backend not compiled in");
            Err(CodecError::UnsupportedFormat(format.extension().into()))
        }
    }
}

/// Open request builder.
///
/// # Example
///
/// ```no_run
/// use memcodecs::{CodecRegistry, EncodedFormat, Limits, OpenRequest};
///
/// let bytes: &[u8] = &[]; // your image bytes
/// let registry = CodecRegistry::all().with_decode(EncodedFormat::Exr, false);
/// let limits = Limits { max_pixels: Some(50_000_000), ..Limits::none() };
/// let source = OpenRequest::new(".png")
///     .with_registry(&registry)
///     .with_limits(&limits)
///     .open(bytes, bytes.len())?;
/// println!("{:?}", source.format());
/// # Ok::<(), memcodecs::CodecError>(())
/// ```
pub struct OpenRequest<'r> {
    identifier: Option<&'r str>,
    limits: Option<&'r Limits>,
    registry: Option<&'r CodecRegistry>,
    codec_config: Option<&'r CodecConfig>,
}

impl<'r> OpenRequest<'r> {
    pub fn new(identifier: &'r str) -> Self {
        Self {
            identifier: Some(identifier),
            limits: None,
            registry: None,
            codec_config: None,
        }
    }

    /// Request that picks the backend from the data's magic bytes.
    pub fn detected() -> Self {
        Self {
            identifier: None,
            limits: None,
            registry: None,
            codec_config: None,
        }
    }

    /// Set resource limits checked against the parsed header.
    pub fn with_limits(mut self, limits: &'r Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set a codec registry to control which formats are enabled.
    pub fn with_registry(mut self, registry: &'r CodecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set format-specific codec configuration.
    pub fn with_codec_config(mut self, config: &'r CodecConfig) -> Self {
        self.codec_config = Some(config);
        self
    }

    /// Select a backend and open `data` with it.
    pub fn open<'a>(
        self,
        data: impl Into<SharedBuffer<'a>>,
        len: usize,
    ) -> Result<Box<dyn SourceResource + 'a>, CodecError> {
        let data: SharedBuffer<'a> = data.into();
        let backend = match self.identifier {
            Some(identifier) => resolve(identifier)?,
            None => resolve_detected(&data.as_slice()[..len.min(data.len())])?,
        };

        if let Some(registry) = self.registry {
            if !registry.can_decode(backend.format) {
                return Err(CodecError::DisabledFormat(backend.format));
            }
        }

        let options = BackendOptions {
            limits: self.limits,
            config: self.codec_config,
        };
        (backend.open)(data, len, &options)
    }
}

/// Create request builder.
pub struct CreateRequest<'r> {
    identifier: &'r str,
    limits: Option<&'r Limits>,
    registry: Option<&'r CodecRegistry>,
    codec_config: Option<&'r CodecConfig>,
}

impl<'r> CreateRequest<'r> {
    pub fn new(identifier: &'r str) -> Self {
        Self {
            identifier,
            limits: None,
            registry: None,
            codec_config: None,
        }
    }

    /// Set resource limits checked against the requested format.
    pub fn with_limits(mut self, limits: &'r Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set a codec registry to control which formats are enabled.
    pub fn with_registry(mut self, registry: &'r CodecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set format-specific codec configuration.
    pub fn with_codec_config(mut self, config: &'r CodecConfig) -> Self {
        self.codec_config = Some(config);
        self
    }

    /// Select a backend and create a sink for `format`.
    pub fn create(self, format: &ImageFormat) -> Result<Box<dyn SinkResource>, CodecError> {
        let backend = resolve(self.identifier)?;

        if let Some(registry) = self.registry {
            if !registry.can_encode(backend.format) {
                return Err(CodecError::DisabledFormat(backend.format));
            }
        }

        let options = BackendOptions {
            limits: self.limits,
            config: self.codec_config,
        };
        (backend.create)(format, &options)
    }
}
