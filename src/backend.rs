//! Compiled-in backend table.
//!
//! Each entry pairs a format family with its accepted identifiers and the
//! constructors for its source and sink adapters. Entries exist only when
//! the backend's feature is enabled, so identifiers of a missing backend
//! simply find no match. Adding a backend means adding a row; the lookup
//! never changes.

use crate::{
    CodecConfig, CodecError, EncodedFormat, ImageFormat, Limits, SharedBuffer, SinkResource,
    SourceResource,
};

/// Per-call settings handed to backend constructors.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BackendOptions<'r> {
    pub(crate) limits: Option<&'r Limits>,
    pub(crate) config: Option<&'r CodecConfig>,
}

impl BackendOptions<'_> {
    pub(crate) fn check_limits(&self, format: &ImageFormat) -> Result<(), CodecError> {
        match self.limits {
            Some(limits) => limits.validate(format),
            None => Ok(()),
        }
    }
}

pub(crate) type OpenFn = for<'a> fn(
    SharedBuffer<'a>,
    usize,
    &BackendOptions<'_>,
) -> Result<Box<dyn SourceResource + 'a>, CodecError>;

pub(crate) type CreateFn =
    fn(&ImageFormat, &BackendOptions<'_>) -> Result<Box<dyn SinkResource>, CodecError>;

/// One row of the backend table.
pub(crate) struct Backend {
    pub(crate) format: EncodedFormat,
    pub(crate) identifiers: &'static [&'static str],
    pub(crate) open: OpenFn,
    pub(crate) create: CreateFn,
}

impl Backend {
    fn accepts(&self, normalized: &str) -> bool {
        self.identifiers.contains(&normalized)
    }
}

/// Dispatch table in priority order: JPEG, PNG, TIFF, OpenEXR.
static BACKENDS: &[Backend] = &[
    #[cfg(feature = "jpeg")]
    Backend {
        format: EncodedFormat::Jpeg,
        identifiers: EncodedFormat::Jpeg.identifiers(),
        open: crate::codecs::jpeg::open,
        create: crate::codecs::jpeg::create,
    },
    #[cfg(feature = "png")]
    Backend {
        format: EncodedFormat::Png,
        identifiers: EncodedFormat::Png.identifiers(),
        open: crate::codecs::png::open,
        create: crate::codecs::png::create,
    },
    #[cfg(feature = "tiff")]
    Backend {
        format: EncodedFormat::Tiff,
        identifiers: EncodedFormat::Tiff.identifiers(),
        open: crate::codecs::tiff::open,
        create: crate::codecs::tiff::create,
    },
    #[cfg(feature = "exr")]
    Backend {
        format: EncodedFormat::Exr,
        identifiers: EncodedFormat::Exr.identifiers(),
        open: crate::codecs::exr::open,
        create: crate::codecs::exr::create,
    },
];

/// Compiled-in backends in priority order.
pub(crate) fn backends() -> &'static [Backend] {
    BACKENDS
}

/// First backend accepting an already-normalized identifier.
pub(crate) fn find(normalized: &str) -> Option<&'static Backend> {
    backends().iter().find(|backend| backend.accepts(normalized))
}

/// Backend for a format family, if compiled in.
pub(crate) fn for_format(format: EncodedFormat) -> Option<&'static Backend> {
    backends().iter().find(|backend| backend.format == format)
}

/// Every identifier the compiled-in backends accept, in dispatch order.
pub fn supported_identifiers() -> impl Iterator<Item = &'static str> {
    backends()
        .iter()
        .flat_map(|backend| backend.identifiers.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_compiled_features() {
        let formats: Vec<_> = backends().iter().map(|b| b.format).collect();
        let compiled: Vec<_> = EncodedFormat::ALL
            .into_iter()
            .filter(|f| f.is_compiled())
            .collect();
        assert_eq!(formats, compiled);
    }

    #[test]
    fn find_selects_owning_family() {
        for format in EncodedFormat::ALL {
            for id in format.identifiers() {
                let found = find(id).map(|b| b.format);
                if format.is_compiled() {
                    assert_eq!(found, Some(format), "{id}");
                } else {
                    assert_eq!(found, None, "{id}");
                }
            }
        }
    }

    #[test]
    fn find_requires_normalized_input() {
        assert!(find("bmp").is_none());
        assert!(find("").is_none());
        // Lookup is exact; normalization is the caller's job.
        assert!(find("JPG").is_none());
        assert!(find(".png").is_none());
    }

    #[test]
    fn supported_identifiers_follow_priority() {
        let ids: Vec<_> = supported_identifiers().collect();
        let expected: Vec<_> = EncodedFormat::ALL
            .into_iter()
            .filter(|f| f.is_compiled())
            .flat_map(|f| f.identifiers().iter().copied())
            .collect();
        assert_eq!(ids, expected);
    }
}
