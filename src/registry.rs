//! Runtime codec registry for enabling/disabling formats.

use crate::EncodedFormat;

/// Set of encoded formats represented as bitflags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FormatSet(u8);

impl FormatSet {
    const EMPTY: Self = FormatSet(0);

    const fn bit(format: EncodedFormat) -> u8 {
        match format {
            EncodedFormat::Jpeg => 1 << 0,
            EncodedFormat::Png => 1 << 1,
            EncodedFormat::Tiff => 1 << 2,
            EncodedFormat::Exr => 1 << 3,
        }
    }

    fn all_compiled() -> Self {
        let bits = EncodedFormat::ALL
            .into_iter()
            .filter(|f| f.is_compiled())
            .fold(0u8, |bits, f| bits | Self::bit(f));
        FormatSet(bits)
    }

    fn contains(self, format: EncodedFormat) -> bool {
        (self.0 & Self::bit(format)) != 0
    }

    fn insert(&mut self, format: EncodedFormat) {
        self.0 |= Self::bit(format);
    }

    fn remove(&mut self, format: EncodedFormat) {
        self.0 &= !Self::bit(format);
    }

    fn iter(self) -> impl Iterator<Item = EncodedFormat> {
        EncodedFormat::ALL
            .into_iter()
            .filter(move |&f| self.contains(f))
    }
}

/// Runtime codec registry.
///
/// Compile-time features determine which backends are *available*; the
/// registry narrows that to the ones *enabled* for a given request. It never
/// adds a backend the build lacks.
///
/// This lets a service restrict formats per request (e.g. refuse EXR uploads
/// while still writing EXR).
#[derive(Clone, Debug)]
pub struct CodecRegistry {
    decode_enabled: FormatSet,
    encode_enabled: FormatSet,
}

impl CodecRegistry {
    /// All compiled-in backends enabled.
    pub fn all() -> Self {
        Self {
            decode_enabled: FormatSet::all_compiled(),
            encode_enabled: FormatSet::all_compiled(),
        }
    }

    /// Nothing enabled; caller must opt in.
    pub fn none() -> Self {
        Self {
            decode_enabled: FormatSet::EMPTY,
            encode_enabled: FormatSet::EMPTY,
        }
    }

    /// Enable or disable decoding for a format.
    pub fn with_decode(mut self, format: EncodedFormat, enabled: bool) -> Self {
        if enabled {
            self.decode_enabled.insert(format);
        } else {
            self.decode_enabled.remove(format);
        }
        self
    }

    /// Enable or disable encoding for a format.
    pub fn with_encode(mut self, format: EncodedFormat, enabled: bool) -> Self {
        if enabled {
            self.encode_enabled.insert(format);
        } else {
            self.encode_enabled.remove(format);
        }
        self
    }

    /// Is this format available (compiled in) AND enabled for decoding?
    pub fn can_decode(&self, format: EncodedFormat) -> bool {
        self.decode_enabled.contains(format) && format.is_compiled()
    }

    /// Is this format available (compiled in) AND enabled for encoding?
    pub fn can_encode(&self, format: EncodedFormat) -> bool {
        self.encode_enabled.contains(format) && format.is_compiled()
    }

    /// Formats that are both compiled in and enabled for decoding.
    pub fn decodable_formats(&self) -> impl Iterator<Item = EncodedFormat> + '_ {
        self.decode_enabled.iter().filter(|&f| self.can_decode(f))
    }

    /// Formats that are both compiled in and enabled for encoding.
    pub fn encodable_formats(&self) -> impl Iterator<Item = EncodedFormat> + '_ {
        self.encode_enabled.iter().filter(|&f| self.can_encode(f))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::all()
    }
}
