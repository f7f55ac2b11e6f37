//! Type identifier normalization.

use std::borrow::Cow;

/// Leading separator stripped from identifiers (`.png` -> `png`).
const SEPARATOR: char = '.';

/// Canonicalize an extension or MIME identifier for table lookup.
///
/// Strips every leading `.` and lowercases the rest. Nothing else is
/// touched: inner dots, slashes, and whitespace survive as-is. Never fails;
/// the empty string normalizes to itself.
///
/// Normalization is idempotent, so it is safe to call on an identifier that
/// was already normalized.
///
/// ```
/// assert_eq!(memcodecs::normalize("..JPG"), "jpg");
/// assert_eq!(memcodecs::normalize("Image/TIFF"), "image/tiff");
/// assert_eq!(memcodecs::normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim_start_matches(SEPARATOR);

    if trimmed.is_ascii() && !trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        return Cow::Borrowed(trimmed);
    }

    let lowered = trimmed.to_lowercase();
    if lowered == trimmed {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_separators() {
        assert_eq!(normalize(".jpg"), "jpg");
        assert_eq!(normalize("...png"), "png");
        assert_eq!(normalize("."), "");
    }

    #[test]
    fn keeps_inner_separators() {
        assert_eq!(normalize("tar.gz"), "tar.gz");
        assert_eq!(normalize(".a.b."), "a.b.");
    }

    #[test]
    fn lowercases() {
        assert_eq!(normalize("JPG"), "jpg");
        assert_eq!(normalize("Image/JPEG"), "image/jpeg");
        assert_eq!(normalize(".ExR"), "exr");
    }

    #[test]
    fn case_and_prefix_variants_agree() {
        let expected = normalize("jpg");
        for raw in ["JPG", ".jpg", "jpg", "..Jpg"] {
            assert_eq!(normalize(raw), expected, "{raw}");
        }
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn no_other_transformation() {
        // Whitespace is not trimmed.
        assert_eq!(normalize(" png"), " png");
        assert_eq!(normalize("png "), "png ");
    }

    #[test]
    fn borrows_when_already_clean() {
        assert!(matches!(normalize("image/png"), Cow::Borrowed(_)));
        assert!(matches!(normalize(".png"), Cow::Borrowed(_)));
        assert!(matches!(normalize("PNG"), Cow::Owned(_)));
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "", ".", "..", "JPG", ".jpg", "image/JPEG", ".TiF", "ÉXR", "..Ǆ", "İmage", " .png",
            "a.B.c", "\u{0130}\u{0307}",
        ];
        for raw in inputs {
            let once = normalize(raw).into_owned();
            let twice = normalize(&once).into_owned();
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }
}
