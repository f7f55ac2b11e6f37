//! Encoded format families and their identifiers.

use core::fmt;

/// Container formats with an in-memory backend.
///
/// Declaration order is dispatch priority: an identifier is tested against
/// JPEG first, then PNG, TIFF, and OpenEXR.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncodedFormat {
    Jpeg,
    Png,
    Tiff,
    Exr,
}

impl EncodedFormat {
    /// Every family, in dispatch priority order.
    pub const ALL: [EncodedFormat; 4] = [
        EncodedFormat::Jpeg,
        EncodedFormat::Png,
        EncodedFormat::Tiff,
        EncodedFormat::Exr,
    ];

    /// Normalized identifiers (extensions and MIME types) this family accepts.
    pub const fn identifiers(self) -> &'static [&'static str] {
        match self {
            EncodedFormat::Jpeg => &["jpg", "jpeg", "image/jpeg"],
            EncodedFormat::Png => &["png", "image/png"],
            EncodedFormat::Tiff => &["tif", "tiff", "image/tiff"],
            EncodedFormat::Exr => &["exr", "image/exr"],
        }
    }

    /// Canonical file extension.
    pub const fn extension(self) -> &'static str {
        match self {
            EncodedFormat::Jpeg => "jpg",
            EncodedFormat::Png => "png",
            EncodedFormat::Tiff => "tif",
            EncodedFormat::Exr => "exr",
        }
    }

    /// MIME type string.
    pub const fn mime_type(self) -> &'static str {
        match self {
            EncodedFormat::Jpeg => "image/jpeg",
            EncodedFormat::Png => "image/png",
            EncodedFormat::Tiff => "image/tiff",
            EncodedFormat::Exr => "image/exr",
        }
    }

    /// Whether this build carries a backend for the family.
    pub const fn is_compiled(self) -> bool {
        match self {
            EncodedFormat::Jpeg => cfg!(feature = "jpeg"),
            EncodedFormat::Png => cfg!(feature = "png"),
            EncodedFormat::Tiff => cfg!(feature = "tiff"),
            EncodedFormat::Exr => cfg!(feature = "exr"),
        }
    }

    /// Whether the format stores pixels without loss.
    pub const fn is_lossless(self) -> bool {
        !matches!(self, EncodedFormat::Jpeg)
    }

    /// Detect format from magic bytes. Returns None if unrecognized.
    pub fn detect(data: &[u8]) -> Option<Self> {
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(EncodedFormat::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(EncodedFormat::Png);
        }

        // TIFF: "II*\0" (little endian) or "MM\0*" (big endian), plus BigTIFF (43)
        if data.len() >= 4 {
            match &data[..4] {
                b"II*\0" | b"MM\0*" | b"II+\0" | b"MM\0+" => return Some(EncodedFormat::Tiff),
                _ => {}
            }
        }

        // OpenEXR: 76 2F 31 01
        if data.starts_with(&[0x76, 0x2F, 0x31, 0x01]) {
            return Some(EncodedFormat::Exr);
        }

        None
    }
}

impl fmt::Display for EncodedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncodedFormat::Jpeg => "JPEG",
            EncodedFormat::Png => "PNG",
            EncodedFormat::Tiff => "TIFF",
            EncodedFormat::Exr => "OpenEXR",
        };
        f.write_str(name)
    }
}
