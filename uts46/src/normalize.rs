//! The two normalizer handles an instance resolves at construction.
//!
//! The UTS #46 normalization profile maps each code point per the IDNA
//! mapping table and composes the result: case mappings and
//! compatibility mappings are applied, ignored characters are removed,
//! disallowed characters become U+FFFD, and deviation characters pass
//! through untouched (transitional mapping is the label processor's job).
//! Plain NFC is used to re-normalize a label after deviation mapping.

use icu_normalizer::uts46::Uts46Mapper;
use icu_normalizer::ComposingNormalizer;
use utf16_iter::Utf16CharsEx;

pub(crate) struct Normalizers {
    uts46: Uts46Mapper,
    nfc: ComposingNormalizer,
}

impl Normalizers {
    pub(crate) fn new() -> Self {
        Normalizers {
            uts46: Uts46Mapper::new(),
            nfc: ComposingNormalizer::new_nfc(),
        }
    }

    /// Normalizes under the UTS #46 profile. Unpaired surrogates come out as
    /// U+FFFD, which the label validity scan then reports as disallowed.
    pub(crate) fn uts46_normalize(&self, src: &[u16]) -> Vec<u16> {
        let mapped = self.uts46.map_normalize(src.chars().map(|c| {
            // The profile lowercases ASCII; doing it up front keeps the
            // ASCII fast path and this path byte-identical.
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        }));
        let mut out = Vec::with_capacity(src.len());
        let mut buf = [0u16; 2];
        for c in mapped {
            out.extend_from_slice(c.encode_utf16(&mut buf));
        }
        out
    }

    /// Appends `tail` to the already-normalized `dest`, re-normalizing
    /// across the boundary; the result equals normalizing the concatenation.
    pub(crate) fn uts46_normalize_second_and_append(&self, dest: &mut Vec<u16>, tail: &[u16]) {
        let mut combined = core::mem::take(dest);
        combined.extend_from_slice(tail);
        *dest = self.uts46_normalize(&combined);
    }

    pub(crate) fn nfc_normalize(&self, src: &[u16]) -> Vec<u16> {
        self.nfc.normalize_utf16(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn maps_case_and_composes() {
        let n = Normalizers::new();
        // A + combining acute composes; uppercase maps down.
        assert_eq!(n.uts46_normalize(&utf16("A\u{0301}BC")), utf16("ábc"));
    }

    #[test]
    fn deviation_characters_pass_through() {
        let n = Normalizers::new();
        assert_eq!(n.uts46_normalize(&utf16("faß")), utf16("faß"));
        assert_eq!(n.uts46_normalize(&utf16("a\u{200c}b")), utf16("a\u{200c}b"));
    }

    #[test]
    fn disallowed_becomes_replacement() {
        let n = Normalizers::new();
        // U+0080 is disallowed under UTS #46.
        assert_eq!(n.uts46_normalize(&[0x80]), utf16("\u{fffd}"));
        // An unpaired surrogate decodes to U+FFFD before mapping.
        assert_eq!(n.uts46_normalize(&[0xd800]), utf16("\u{fffd}"));
    }

    #[test]
    fn second_and_append_recombines_at_the_boundary() {
        let n = Normalizers::new();
        let mut dest = utf16("fa");
        n.uts46_normalize_second_and_append(&mut dest, &utf16("\u{0308}z"));
        assert_eq!(dest, utf16("fäz"));
    }
}
