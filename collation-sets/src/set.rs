//! A mutable set of code points and strings, frozen into a
//! [`CodePointInversionListAndStringList`] when an enumeration finishes.

use std::collections::BTreeSet;

use icu_collections::codepointinvlist::CodePointInversionListBuilder;
use icu_collections::codepointinvliststringlist::CodePointInversionListAndStringList;
use zerovec::VarZeroVec;

use crate::error::CollationSetError;

#[derive(Default)]
pub(crate) struct UnicodeSetBuilder {
    code_points: CodePointInversionListBuilder,
    strings: BTreeSet<String>,
}

impl UnicodeSetBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add32(&mut self, c: u32) {
        self.code_points.add32(c);
    }

    pub(crate) fn add_range32(&mut self, start: u32, end: u32) {
        self.code_points.add_range32(&(start..=end));
    }

    /// Adds a UTF-16 string. A string of exactly one code point belongs on
    /// the code point side.
    pub(crate) fn add_utf16(&mut self, units: &[u16]) {
        let s: String = char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.code_points.add_char(c),
            (None, _) => {}
            _ => {
                self.strings.insert(s);
            }
        }
    }

    pub(crate) fn build(
        self,
    ) -> Result<CodePointInversionListAndStringList<'static>, CollationSetError> {
        let code_points = self.code_points.build();
        // BTreeSet iteration is sorted and de-duplicated, which is exactly
        // the string-list invariant.
        let strings: Vec<String> = self.strings.into_iter().collect();
        let str_list = VarZeroVec::from(strings.as_slice()).into_owned();
        CodePointInversionListAndStringList::try_from(code_points, str_list)
            .map_err(|_| CollationSetError::Internal("string list invariant"))
    }
}
