//! IDNA2008 / UTS #46 internationalized domain name processing.
//!
//! Converts domain names between their Unicode form and their
//! ASCII-Compatible Encoding (the `xn--` Punycode form), per
//! [Unicode Technical Standard #46](https://www.unicode.org/reports/tr46/):
//! per-character mapping and normalization, Punycode translation, and the
//! label-level validity rules (hyphen placement, combining marks, bidi and
//! joiner-context constraints, length limits).
//!
//! Processing never stops at the first broken rule. Rule violations
//! accumulate as bit flags in [`IdnaInfo`] so a caller gets the complete
//! diagnosis for a name in one pass, with U+FFFD standing in for the
//! offending characters.
//!
//! ```
//! use uts46::{IdnaInfo, IdnaOptions, Uts46};
//!
//! let uts46 = Uts46::new(IdnaOptions::NONTRANSITIONAL_TO_ASCII);
//! let mut dest = Vec::new();
//! let mut info = IdnaInfo::default();
//! uts46.name_to_ascii(&"faß.de".encode_utf16().collect::<Vec<u16>>(), &mut dest, &mut info);
//! assert!(!info.has_errors());
//! assert_eq!(String::from_utf16(&dest).unwrap(), "xn--fa-hia.de");
//! ```
//!
//! Strings are UTF-16, matching DNS's code unit length limits; `&str`
//! convenience wrappers are provided. An instance is immutable after
//! construction and can be shared across threads.

#![warn(missing_docs)]

mod bidi;
mod contextj;
mod normalize;
mod process;
mod punycode;
mod utf16;

use normalize::Normalizers;
use process::Processor;

bitflags::bitflags! {
    /// Processing options, OR-combinable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct IdnaOptions: u32 {
        /// Restrict ASCII characters to letters, digits, hyphen and dot.
        const USE_STD3_RULES = 2;
        /// Check the IDNA2008 bidi rule on each label.
        const CHECK_BIDI = 4;
        /// Check the IDNA2008 CONTEXTJ rules for ZWNJ and ZWJ.
        const CHECK_CONTEXTJ = 8;
        /// Do not map deviation characters in `*_to_ascii`.
        const NONTRANSITIONAL_TO_ASCII = 0x10;
        /// Do not map deviation characters in `*_to_unicode`.
        const NONTRANSITIONAL_TO_UNICODE = 0x20;
    }
}

bitflags::bitflags! {
    /// The rule violations found while processing a name or label.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct IdnaErrors: u32 {
        /// A non-final label was empty, or the whole input was.
        const EMPTY_LABEL = 1;
        /// A label was longer than 63 code units in `*_to_ascii`.
        const LABEL_TOO_LONG = 2;
        /// The domain name exceeded 253 code units in `name_to_ascii`.
        const DOMAIN_NAME_TOO_LONG = 4;
        /// A label started with a hyphen-minus.
        const LEADING_HYPHEN = 8;
        /// A label ended with a hyphen-minus.
        const TRAILING_HYPHEN = 0x10;
        /// A label had hyphen-minus in both position 3 and 4.
        const HYPHEN_3_4 = 0x20;
        /// A label started with a combining mark.
        const LEADING_COMBINING_MARK = 0x40;
        /// A label or domain name contained a disallowed character.
        const DISALLOWED = 0x80;
        /// A label started with `xn--` but did not decode as Punycode.
        const PUNYCODE = 0x100;
        /// A label contained a dot (only possible after Punycode decoding
        /// or in single-label entry points).
        const LABEL_HAS_DOT = 0x200;
        /// An `xn--` label was not in its canonical normalized form.
        const INVALID_ACE_LABEL = 0x400;
        /// A label did not meet the IDNA2008 bidi requirements.
        const BIDI = 0x800;
        /// A label did not meet the IDNA2008 CONTEXTJ requirements.
        const CONTEXTJ = 0x1000;
    }
}

/// The per-call diagnostics, reset by every entry point.
#[derive(Debug, Clone, Default)]
pub struct IdnaInfo {
    pub(crate) errors: IdnaErrors,
    pub(crate) has_dev_chars: bool,
}

impl IdnaInfo {
    /// The accumulated rule violations.
    pub fn errors(&self) -> IdnaErrors {
        self.errors
    }

    /// True if any rule violation was found.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True if the input contained a deviation character (ß, final sigma,
    /// ZWNJ, ZWJ), mapped or not.
    pub fn has_dev_chars(&self) -> bool {
        self.has_dev_chars
    }

    /// True if transitional and nontransitional processing of the input
    /// differ.
    pub fn is_transitional_different(&self) -> bool {
        self.has_dev_chars
    }

    pub(crate) fn reset(&mut self) {
        *self = IdnaInfo::default();
    }
}

/// A UTS #46 processor instance: resolved normalizers plus options.
pub struct Uts46 {
    options: IdnaOptions,
    normalizers: Normalizers,
}

impl Uts46 {
    /// Creates an instance with the given options.
    pub fn new(options: IdnaOptions) -> Self {
        Uts46 {
            options,
            normalizers: Normalizers::new(),
        }
    }

    fn processor(&self) -> Processor<'_> {
        Processor {
            options: self.options,
            normalizers: &self.normalizers,
        }
    }

    /// Converts a single label to its ASCII form. On any error the
    /// destination is cleared; `info` holds the diagnosis.
    pub fn label_to_ascii(&self, label: &[u16], dest: &mut Vec<u16>, info: &mut IdnaInfo) {
        self.processor().process(label, true, true, dest, info);
        if info.has_errors() {
            dest.clear();
        }
    }

    /// Converts a single label to its Unicode form. The destination is
    /// returned even on error, with U+FFFD marking offending characters.
    pub fn label_to_unicode(&self, label: &[u16], dest: &mut Vec<u16>, info: &mut IdnaInfo) {
        self.processor().process(label, true, false, dest, info);
    }

    /// Converts a whole domain name to its ASCII form. On any error the
    /// destination is cleared; `info` holds the diagnosis.
    pub fn name_to_ascii(&self, name: &[u16], dest: &mut Vec<u16>, info: &mut IdnaInfo) {
        self.processor().process(name, false, true, dest, info);
        if dest.len() >= 254 && (dest.len() > 254 || dest[253] != 0x2e) {
            info.errors |= IdnaErrors::DOMAIN_NAME_TOO_LONG;
        }
        if info.has_errors() {
            dest.clear();
        }
    }

    /// Converts a whole domain name to its Unicode form. The destination is
    /// returned even on error, with U+FFFD marking offending characters.
    pub fn name_to_unicode(&self, name: &[u16], dest: &mut Vec<u16>, info: &mut IdnaInfo) {
        self.processor().process(name, false, false, dest, info);
    }

    /// [`name_to_ascii`](Self::name_to_ascii) over `&str`.
    pub fn name_to_ascii_str(&self, name: &str) -> (String, IdnaInfo) {
        self.str_entry(name, |src, dest, info| self.name_to_ascii(src, dest, info))
    }

    /// [`name_to_unicode`](Self::name_to_unicode) over `&str`.
    pub fn name_to_unicode_str(&self, name: &str) -> (String, IdnaInfo) {
        self.str_entry(name, |src, dest, info| self.name_to_unicode(src, dest, info))
    }

    /// [`label_to_ascii`](Self::label_to_ascii) over `&str`.
    pub fn label_to_ascii_str(&self, label: &str) -> (String, IdnaInfo) {
        self.str_entry(label, |src, dest, info| self.label_to_ascii(src, dest, info))
    }

    /// [`label_to_unicode`](Self::label_to_unicode) over `&str`.
    pub fn label_to_unicode_str(&self, label: &str) -> (String, IdnaInfo) {
        self.str_entry(label, |src, dest, info| {
            self.label_to_unicode(src, dest, info)
        })
    }

    fn str_entry(
        &self,
        src: &str,
        run: impl Fn(&[u16], &mut Vec<u16>, &mut IdnaInfo),
    ) -> (String, IdnaInfo) {
        let src: Vec<u16> = src.encode_utf16().collect();
        let mut dest = Vec::new();
        let mut info = IdnaInfo::default();
        run(&src, &mut dest, &mut info);
        let out = char::decode_utf16(dest.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        (out, info)
    }
}
