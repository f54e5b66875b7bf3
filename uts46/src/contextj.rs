//! The IDNA2008 CONTEXTJ rules for the zero-width joiners (RFC 5892,
//! Appendix A.1 and A.2).

use icu_properties::{maps, CanonicalCombiningClass, JoiningType};

use crate::utf16::{next_code_point, prev_code_point};

const ZWNJ: u16 = 0x200c;
const ZWJ: u16 = 0x200d;

/// Checks every ZWNJ and ZWJ occurrence in the label.
pub(crate) fn is_label_ok_context_j(label: &[u16]) -> bool {
    let ccc = maps::canonical_combining_class();
    let joining_type = maps::joining_type();
    for i in 0..label.len() {
        if label[i] == ZWNJ {
            // A.1: allowed after a virama, or between a left-/dual-joining
            // sequence and a right-/dual-joining sequence (skipping
            // transparent characters on both sides).
            if i == 0 {
                return false;
            }
            let (c, mut j) = prev_code_point(label, i);
            if ccc.get32(c) == CanonicalCombiningClass::Virama {
                continue;
            }
            let mut c = c;
            loop {
                let jt = joining_type.get32(c);
                if jt == JoiningType::Transparent {
                    if j == 0 {
                        return false;
                    }
                    let (prev, start) = prev_code_point(label, j);
                    c = prev;
                    j = start;
                } else if jt == JoiningType::LeftJoining || jt == JoiningType::DualJoining {
                    break; // precontext fulfilled
                } else {
                    return false;
                }
            }
            let mut j = i + 1;
            loop {
                if j == label.len() {
                    return false;
                }
                let (c, next) = next_code_point(label, j);
                j = next;
                let jt = joining_type.get32(c);
                if jt == JoiningType::Transparent {
                    // skip
                } else if jt == JoiningType::RightJoining || jt == JoiningType::DualJoining {
                    break; // postcontext fulfilled
                } else {
                    return false;
                }
            }
        } else if label[i] == ZWJ {
            // A.2: only allowed directly after a virama.
            if i == 0 {
                return false;
            }
            let (c, _) = prev_code_point(label, i);
            if ccc.get32(c) != CanonicalCombiningClass::Virama {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn zwj_requires_a_virama_before_it() {
        // Devanagari KA + virama + ZWJ + KA.
        assert!(is_label_ok_context_j(&utf16(
            "\u{0915}\u{094d}\u{200d}\u{0915}"
        )));
        assert!(!is_label_ok_context_j(&utf16("a\u{200d}b")));
        assert!(!is_label_ok_context_j(&utf16("\u{200d}a")));
    }

    #[test]
    fn zwnj_accepts_a_virama() {
        assert!(is_label_ok_context_j(&utf16(
            "\u{0915}\u{094d}\u{200c}\u{0915}"
        )));
    }

    #[test]
    fn zwnj_joining_type_contexts() {
        // Arabic BEH is dual-joining: D ZWNJ D passes.
        assert!(is_label_ok_context_j(&utf16("\u{0628}\u{200c}\u{0628}")));
        // Transparent characters are skipped on both sides.
        assert!(is_label_ok_context_j(&utf16(
            "\u{0628}\u{064e}\u{200c}\u{064e}\u{0628}"
        )));
        // Alef is right-joining only: it cannot open the precontext.
        assert!(!is_label_ok_context_j(&utf16("\u{0627}\u{200c}\u{0628}")));
        // But it can close the postcontext.
        assert!(is_label_ok_context_j(&utf16("\u{0628}\u{200c}\u{0627}")));
        // Non-joining neighbors fail either side.
        assert!(!is_label_ok_context_j(&utf16("a\u{200c}b")));
        assert!(!is_label_ok_context_j(&utf16("\u{0628}\u{200c}a")));
        // Running off the end of the label fails.
        assert!(!is_label_ok_context_j(&utf16("\u{0628}\u{200c}")));
        assert!(!is_label_ok_context_j(&utf16("\u{200c}\u{0628}")));
    }

    #[test]
    fn labels_without_joiners_pass_trivially() {
        assert!(is_label_ok_context_j(&utf16("example")));
    }
}
