//! Enumerates every contraction input string and expansion result reachable
//! from a collation data table and its base.

use icu_collections::codepointinvlist::{CodePointInversionList, CodePointInversionListBuilder};
use icu_collections::codepointinvliststringlist::CodePointInversionListAndStringList;

use crate::ce32::{Ce32, Ce32Tag};
use crate::data::CollationData;
use crate::error::CollationSetError;
use crate::set::UnicodeSetBuilder;
use crate::tailored::append_code_point;
use crate::trie::TrieEnumerator;

/// The contraction and expansion sets of one data table (tailoring plus
/// base, without double counting). A side that was not requested is `None`.
#[derive(Debug)]
pub struct CneSets {
    /// Every string that is the input of a contraction.
    pub contractions: Option<CodePointInversionListAndStringList<'static>>,
    /// Every code point or string that maps to more than one CE.
    pub expansions: Option<CodePointInversionListAndStringList<'static>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Phase {
    /// Single pass, no base data.
    NoTailoring,
    /// Pass over the tailoring: collect its mapped ranges.
    CollectTailored,
    /// Pass over the base: exclude the tailored ranges.
    ExcludeTailored,
}

/// Walks a data table (and its base) and collects contraction inputs and
/// expansion outputs.
pub struct ContractionsAndExpansions<'a> {
    data: &'a CollationData<'a>,
    phase: Phase,
    tailored_ranges: CodePointInversionListBuilder,
    tailored: CodePointInversionList<'static>,
    contractions: Option<UnicodeSetBuilder>,
    expansions: Option<UnicodeSetBuilder>,
    add_prefixes: bool,
    prefix: Option<Vec<u16>>,
    suffix: Option<Vec<u16>>,
}

enum Which {
    Contractions,
    Expansions,
}

impl<'a> ContractionsAndExpansions<'a> {
    /// Enumerates `data` (both phases when it has a base). `contractions`
    /// and `expansions` select which sets to collect; `add_prefixes` also
    /// walks prefix (pre-context) branches.
    pub fn for_data(
        data: &'a CollationData<'a>,
        contractions: bool,
        expansions: bool,
        add_prefixes: bool,
    ) -> Result<CneSets, CollationSetError> {
        let mut this = ContractionsAndExpansions {
            data,
            phase: if data.base.is_some() {
                Phase::CollectTailored
            } else {
                Phase::NoTailoring
            },
            tailored_ranges: CodePointInversionListBuilder::new(),
            tailored: CodePointInversionListBuilder::new().build(),
            contractions: contractions.then(UnicodeSetBuilder::new),
            expansions: expansions.then(UnicodeSetBuilder::new),
            add_prefixes,
            prefix: None,
            suffix: None,
        };
        this.enumerate(data)?;
        if let Some(base) = data.base {
            // Add from the base data, but only for un-tailored code points.
            this.tailored = core::mem::take(&mut this.tailored_ranges).build();
            this.phase = Phase::ExcludeTailored;
            this.data = base;
            this.enumerate(base)?;
        }
        Ok(CneSets {
            contractions: match this.contractions {
                Some(builder) => Some(builder.build()?),
                None => None,
            },
            expansions: match this.expansions {
                Some(builder) => Some(builder.build()?),
                None => None,
            },
        })
    }

    fn enumerate(&mut self, d: &CollationData<'_>) -> Result<(), CollationSetError> {
        for (start, end, ce32) in d.ce32_map.iter_ranges() {
            self.range(start, end, ce32)?;
        }
        Ok(())
    }

    fn range(&mut self, start: u32, end: u32, ce32: Ce32) -> Result<(), CollationSetError> {
        match self.phase {
            Phase::NoTailoring => {}
            Phase::CollectTailored => {
                if ce32 == Ce32::FALLBACK {
                    // Falls back to the base: not tailored.
                    return Ok(());
                }
                self.tailored_ranges.add_range32(&(start..=end));
            }
            Phase::ExcludeTailored => {
                if start == end {
                    if self.tailored.contains32(start) {
                        return Ok(());
                    }
                } else {
                    let mut remainder = CodePointInversionListBuilder::new();
                    remainder.add_range32(&(start..=end));
                    remainder.remove_set(&self.tailored);
                    let remainder = remainder.build();
                    if (remainder.size() as u32) < end - start + 1 {
                        for sub in remainder.iter_ranges() {
                            self.handle_ce32(*sub.start(), *sub.end(), ce32)?;
                        }
                        return Ok(());
                    }
                }
            }
        }
        self.handle_ce32(start, end, ce32)
    }

    fn handle_ce32(&mut self, start: u32, end: u32, mut ce32: Ce32) -> Result<(), CollationSetError> {
        loop {
            if !ce32.is_special() {
                return Ok(());
            }
            match ce32.tag() {
                Ce32Tag::Fallback => return Ok(()),
                Ce32Tag::Expansion32 | Ce32Tag::Expansion | Ce32Tag::Hangul => {
                    // Under a prefix the relevant strings have been added
                    // already.
                    if self.prefix.is_none() {
                        self.add_expansions(start, end);
                    }
                    return Ok(());
                }
                Ce32Tag::Prefix => return self.handle_prefixes(start, end, ce32),
                Ce32Tag::Contraction => return self.handle_contractions(start, end, ce32),
                Ce32Tag::Digit => {
                    // Fetch the non-numeric-collation CE32 and continue.
                    ce32 = self.data.ce32_at(ce32.digit_index())?;
                }
                Ce32Tag::Implicit => {
                    if ce32.0 & 1 != 0 {
                        return Ok(());
                    }
                    if start != 0 || end != 0 {
                        return Err(CollationSetError::Internal(
                            "implicit U+0000 case outside [0, 0]",
                        ));
                    }
                    // Fetch the normal CE32 for U+0000 and continue.
                    ce32 = self.data.ce32_at(0)?;
                }
                Ce32Tag::Reserved | Ce32Tag::LeadSurrogate => {
                    return Err(CollationSetError::Internal("reserved CE32 tag"));
                }
                Ce32Tag::LongPrimary | Ce32Tag::Offset => return Ok(()),
            }
        }
    }

    fn handle_prefixes(
        &mut self,
        start: u32,
        end: u32,
        ce32: Ce32,
    ) -> Result<(), CollationSetError> {
        let d = self.data;
        let index = ce32.context_index();
        // Default CE32 if no prefix matches.
        let default = d.default_ce32_at(index)?;
        self.handle_ce32(start, end, default)?;
        if !self.add_prefixes {
            return Ok(());
        }
        let mut prefixes = TrieEnumerator::new(&d.contexts, index + 2);
        while let Some((pfx, value)) = prefixes.next()? {
            self.prefix = Some(pfx);
            // Prefix/pre-context mappings are special kinds of contractions
            // that always yield expansions.
            self.add_strings(start, end, Which::Contractions);
            self.add_strings(start, end, Which::Expansions);
            self.handle_ce32(start, end, Ce32(value as u32))?;
        }
        self.prefix = None;
        Ok(())
    }

    fn handle_contractions(
        &mut self,
        start: u32,
        end: u32,
        ce32: Ce32,
    ) -> Result<(), CollationSetError> {
        let d = self.data;
        let index = ce32.context_index();
        let default = d.default_ce32_at(index)?;
        if default.is_contraction() {
            // The default fell back to another set of contractions: we are
            // underneath a prefix, and the empty prefix maps to the same
            // contractions.
            if self.prefix.is_none() {
                return Err(CollationSetError::Internal("stray contraction default"));
            }
        } else {
            self.handle_ce32(start, end, default)?;
        }
        let mut suffixes = TrieEnumerator::new(&d.contexts, index + 2);
        while let Some((sfx, value)) = suffixes.next()? {
            self.suffix = Some(sfx);
            self.add_strings(start, end, Which::Contractions);
            if self.prefix.is_some() {
                self.add_strings(start, end, Which::Expansions);
            }
            self.handle_ce32(start, end, Ce32(value as u32))?;
        }
        self.suffix = None;
        Ok(())
    }

    fn add_expansions(&mut self, start: u32, end: u32) {
        if self.prefix.is_none() && self.suffix.is_none() {
            if let Some(expansions) = &mut self.expansions {
                expansions.add_range32(start, end);
            }
        } else {
            self.add_strings(start, end, Which::Expansions);
        }
    }

    fn add_strings(&mut self, start: u32, end: u32, which: Which) {
        let set = match which {
            Which::Contractions => &mut self.contractions,
            Which::Expansions => &mut self.expansions,
        };
        let Some(set) = set else { return };
        let mut s = Vec::new();
        if let Some(prefix) = &self.prefix {
            s.extend_from_slice(prefix);
        }
        let prefix_len = s.len();
        for c in start..=end {
            append_code_point(&mut s, c);
            if let Some(suffix) = &self.suffix {
                s.extend_from_slice(suffix);
            }
            set.add_utf16(&s);
            s.truncate(prefix_len);
        }
    }
}
