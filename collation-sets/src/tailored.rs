//! Computes the set of code points and strings whose mappings a tailoring
//! changes relative to its base.

use icu_collections::codepointinvliststringlist::CodePointInversionListAndStringList;

use crate::ce32::{self, Ce32, Ce32Tag};
use crate::data::{hangul, CollationData};
use crate::error::CollationSetError;
use crate::set::UnicodeSetBuilder;
use crate::trie::TrieEnumerator;

// Sentinel keys for the parallel trie walks. U+FFFF is untailorable, so it
// never occurs in a prefix, and at most occurs as a single-unit suffix for a
// root-collator boundary contraction.
const NO_PREFIX: &[u16] = &[0xffff];
const NO_SUFFIX: &[u16] = &[0xffff, 0xffff];

/// Derives the set of tailored code points and strings: everything whose
/// resolved CE mapping (including prefix and contraction context) differs
/// between a tailoring and its base.
pub struct TailoredSet<'a> {
    data: &'a CollationData<'a>,
    base: &'a CollationData<'a>,
    tailored: UnicodeSetBuilder,
    prefix: Option<Vec<u16>>,
    suffix: Option<Vec<u16>>,
}

impl<'a> TailoredSet<'a> {
    /// Diffs `data` against its base. Data without a base has nothing to
    /// differ from; the result is empty.
    pub fn for_data(
        data: &'a CollationData<'a>,
    ) -> Result<CodePointInversionListAndStringList<'static>, CollationSetError> {
        let mut this = TailoredSet {
            data,
            base: data.base.unwrap_or(data),
            tailored: UnicodeSetBuilder::new(),
            prefix: None,
            suffix: None,
        };
        if data.base.is_some() {
            for (start, end, ce32) in data.ce32_map.iter_ranges() {
                if ce32 == Ce32::FALLBACK {
                    // Falls back to the base: not tailored.
                    continue;
                }
                this.handle_ce32(start, end, ce32)?;
            }
        }
        this.tailored.build()
    }

    fn handle_ce32(&mut self, start: u32, end: u32, mut ce32: Ce32) -> Result<(), CollationSetError> {
        if ce32.is_special() {
            ce32 = self.data.indirect_ce32(ce32)?;
            if ce32 == Ce32::FALLBACK {
                return Ok(());
            }
        }
        for c in start..=end {
            let base_ce32 = self.base.final_ce32(self.base.ce32(c))?;
            // Do not just compare bits when either side is special:
            // contractions and expansions in different data objects normally
            // differ even when their table offsets happen to match.
            if ce32.is_special() || base_ce32.is_special() {
                self.compare(c, ce32, base_ce32)?;
            } else if ce32 != base_ce32 {
                self.tailored.add32(c);
            }
        }
        Ok(())
    }

    fn compare(&mut self, c: u32, mut ce32: Ce32, mut base_ce32: Ce32) -> Result<(), CollationSetError> {
        let data = self.data;
        let base = self.base;

        if ce32.is_prefix() {
            let p = ce32.context_index();
            ce32 = data.final_ce32(data.default_ce32_at(p)?)?;
            if base_ce32.is_prefix() {
                let q = base_ce32.context_index();
                base_ce32 = base.final_ce32(base.default_ce32_at(q)?)?;
                self.compare_prefixes(c, p + 2, q + 2)?;
            } else {
                self.add_prefixes(data, c, p + 2)?;
            }
        } else if base_ce32.is_prefix() {
            let q = base_ce32.context_index();
            base_ce32 = base.final_ce32(base.default_ce32_at(q)?)?;
            self.add_prefixes(base, c, q + 2)?;
        }

        if ce32.is_contraction() {
            let p = ce32.context_index();
            ce32 = data.final_ce32(data.default_ce32_at(p)?)?;
            if base_ce32.is_contraction() {
                let q = base_ce32.context_index();
                base_ce32 = base.final_ce32(base.default_ce32_at(q)?)?;
                self.compare_contractions(c, p + 2, q + 2)?;
            } else {
                self.add_contractions(data, c, p + 2)?;
            }
        } else if base_ce32.is_contraction() {
            let q = base_ce32.context_index();
            base_ce32 = base.final_ce32(base.default_ce32_at(q)?)?;
            self.add_contractions(base, c, q + 2)?;
        }

        let tag = ce32.is_special().then(|| ce32.tag());
        let base_tag = base_ce32.is_special().then(|| base_ce32.tag());

        // The tailoring data builder does not write offset tags; performance
        // of tailored characters matters more than the space they save.
        if tag == Some(Ce32Tag::Offset) {
            return Err(CollationSetError::Internal("offset tag in tailoring data"));
        }

        // A contraction's default CE32 may itself be a contraction CE32 when
        // it equals the default of the enclosing prefix data; those defaults
        // are compared on the prefix path.
        if tag == Some(Ce32Tag::Contraction) || base_tag == Some(Ce32Tag::Contraction) {
            if tag != base_tag || self.prefix.is_none() {
                return Err(CollationSetError::Internal("stray contraction default"));
            }
            return Ok(());
        }

        if tag == Some(Ce32Tag::Prefix) || base_tag == Some(Ce32Tag::Prefix) {
            return Err(CollationSetError::Internal("prefix tag after context peel"));
        }

        if base_tag == Some(Ce32Tag::Offset) {
            // A tailoring CE may be a copy of a base offset-tag CE. Offset
            // tags always yield long-primary CEs with common
            // secondary/tertiary weights, so it suffices to compare the
            // reconstructed primary.
            if !ce32.is_long_primary() {
                self.add(c);
                return Ok(());
            }
            let data_ce = base.ce_at(base_ce32.offset_index())?;
            let p = ce32::three_byte_primary_for_offset_data(c, data_ce);
            if ce32.long_primary_weight() != p {
                self.add(c);
            }
            return Ok(());
        }

        if tag != base_tag {
            self.add(c);
            return Ok(());
        }

        match tag {
            Some(Ce32Tag::Expansion32) => {
                let (i, len) = expansion32_slice(data, ce32)?;
                let (bi, blen) = expansion32_slice(base, base_ce32)?;
                if len != blen {
                    self.add(c);
                    return Ok(());
                }
                for k in 0..len {
                    if data.ce32s.get(i + k) != base.ce32s.get(bi + k) {
                        self.add(c);
                        break;
                    }
                }
            }
            Some(Ce32Tag::Expansion) => {
                let (i, len) = expansion_slice(data, ce32)?;
                let (bi, blen) = expansion_slice(base, base_ce32)?;
                if len != blen {
                    self.add(c);
                    return Ok(());
                }
                for k in 0..len {
                    if data.ces.get(i + k) != base.ces.get(bi + k) {
                        self.add(c);
                        break;
                    }
                }
            }
            Some(Ce32Tag::Hangul) => {
                let (l, v, t) = hangul::decompose(c)
                    .ok_or(CollationSetError::Internal("hangul tag outside syllables"))?;
                if self.data.jamo_ce(l as usize)? != self.base.jamo_ce(l as usize)?
                    || self.data.jamo_ce(hangul::v_index(v))? != self.base.jamo_ce(hangul::v_index(v))?
                    || (t != 0
                        && self.data.jamo_ce(hangul::t_index(t))?
                            != self.base.jamo_ce(hangul::t_index(t))?)
                {
                    self.add(c);
                }
            }
            _ => {
                if ce32 != base_ce32 {
                    self.add(c);
                }
            }
        }
        Ok(())
    }

    /// Parallel iteration over the prefixes of both tables.
    fn compare_prefixes(&mut self, c: u32, p: usize, q: usize) -> Result<(), CollationSetError> {
        let data = self.data;
        let base = self.base;
        let mut prefixes = TrieEnumerator::new(&data.contexts, p);
        let mut base_prefixes = TrieEnumerator::new(&base.contexts, q);
        let mut tp = fetch(&mut prefixes, NO_PREFIX)?;
        let mut bp = fetch(&mut base_prefixes, NO_PREFIX)?;
        while tp.0 != NO_PREFIX || bp.0 != NO_PREFIX {
            match tp.0.cmp(&bp.0) {
                core::cmp::Ordering::Less => {
                    // In the tailoring but not the base.
                    self.add_prefix(data, &tp.0, c, tp.1)?;
                    tp = fetch(&mut prefixes, NO_PREFIX)?;
                }
                core::cmp::Ordering::Greater => {
                    // In the base but not the tailoring: tailored away.
                    self.add_prefix(base, &bp.0, c, bp.1)?;
                    bp = fetch(&mut base_prefixes, NO_PREFIX)?;
                }
                core::cmp::Ordering::Equal => {
                    self.prefix = Some(tp.0.clone());
                    self.compare(c, tp.1, bp.1)?;
                    self.prefix = None;
                    tp = fetch(&mut prefixes, NO_PREFIX)?;
                    bp = fetch(&mut base_prefixes, NO_PREFIX)?;
                }
            }
        }
        Ok(())
    }

    /// Parallel iteration over the contraction suffixes of both tables.
    fn compare_contractions(&mut self, c: u32, p: usize, q: usize) -> Result<(), CollationSetError> {
        let data = self.data;
        let base = self.base;
        let mut suffixes = TrieEnumerator::new(&data.contexts, p);
        let mut base_suffixes = TrieEnumerator::new(&base.contexts, q);
        let mut ts = fetch(&mut suffixes, NO_SUFFIX)?;
        let mut bs = fetch(&mut base_suffixes, NO_SUFFIX)?;
        while ts.0 != NO_SUFFIX || bs.0 != NO_SUFFIX {
            match ts.0.cmp(&bs.0) {
                core::cmp::Ordering::Less => {
                    self.add_suffix(c, &ts.0);
                    ts = fetch(&mut suffixes, NO_SUFFIX)?;
                }
                core::cmp::Ordering::Greater => {
                    self.add_suffix(c, &bs.0);
                    bs = fetch(&mut base_suffixes, NO_SUFFIX)?;
                }
                core::cmp::Ordering::Equal => {
                    self.suffix = Some(ts.0.clone());
                    self.compare(c, ts.1, bs.1)?;
                    self.suffix = None;
                    ts = fetch(&mut suffixes, NO_SUFFIX)?;
                    bs = fetch(&mut base_suffixes, NO_SUFFIX)?;
                }
            }
        }
        Ok(())
    }

    fn add_prefixes(
        &mut self,
        d: &CollationData<'_>,
        c: u32,
        pos: usize,
    ) -> Result<(), CollationSetError> {
        let mut prefixes = TrieEnumerator::new(&d.contexts, pos);
        while let Some((pfx, value)) = prefixes.next()? {
            self.add_prefix(d, &pfx, c, Ce32(value as u32))?;
        }
        Ok(())
    }

    fn add_prefix(
        &mut self,
        d: &CollationData<'_>,
        pfx: &[u16],
        c: u32,
        ce32: Ce32,
    ) -> Result<(), CollationSetError> {
        let ce32 = d.final_ce32(ce32)?;
        if ce32.is_contraction() {
            self.prefix = Some(pfx.to_vec());
            self.add_contractions(d, c, ce32.context_index() + 2)?;
            self.prefix = None;
        }
        let mut s = pfx.to_vec();
        append_code_point(&mut s, c);
        self.tailored.add_utf16(&s);
        Ok(())
    }

    fn add_contractions(
        &mut self,
        d: &CollationData<'_>,
        c: u32,
        pos: usize,
    ) -> Result<(), CollationSetError> {
        let mut suffixes = TrieEnumerator::new(&d.contexts, pos);
        while let Some((sfx, _)) = suffixes.next()? {
            self.add_suffix(c, &sfx);
        }
        Ok(())
    }

    fn add_suffix(&mut self, c: u32, sfx: &[u16]) {
        let mut s = Vec::new();
        if let Some(prefix) = &self.prefix {
            s.extend_from_slice(prefix);
        }
        append_code_point(&mut s, c);
        s.extend_from_slice(sfx);
        self.tailored.add_utf16(&s);
    }

    fn add(&mut self, c: u32) {
        if self.prefix.is_none() && self.suffix.is_none() {
            self.tailored.add32(c);
            return;
        }
        let mut s = Vec::new();
        if let Some(prefix) = &self.prefix {
            s.extend_from_slice(prefix);
        }
        append_code_point(&mut s, c);
        if let Some(suffix) = &self.suffix {
            s.extend_from_slice(suffix);
        }
        self.tailored.add_utf16(&s);
    }
}

fn fetch(
    iter: &mut TrieEnumerator<'_>,
    sentinel: &[u16],
) -> Result<(Vec<u16>, Ce32), CollationSetError> {
    match iter.next()? {
        Some((key, value)) => Ok((key, Ce32(value as u32))),
        None => Ok((sentinel.to_vec(), Ce32(0))),
    }
}

fn expansion32_slice(
    d: &CollationData<'_>,
    ce32: Ce32,
) -> Result<(usize, usize), CollationSetError> {
    let mut index = ce32.expansion_index();
    let mut length = ce32.expansion_length();
    if length == 0 {
        length = d
            .ce32s
            .get(index)
            .ok_or(CollationSetError::InvalidData("ce32s index out of range"))?
            as usize;
        index += 1;
    }
    Ok((index, length))
}

fn expansion_slice(d: &CollationData<'_>, ce32: Ce32) -> Result<(usize, usize), CollationSetError> {
    let mut index = ce32.expansion_index();
    let mut length = ce32.expansion_length();
    if length == 0 {
        length = d
            .ces
            .get(index)
            .ok_or(CollationSetError::InvalidData("ces index out of range"))?
            as usize;
        index += 1;
    }
    Ok((index, length))
}

pub(crate) fn append_code_point(s: &mut Vec<u16>, c: u32) {
    if c <= 0xffff {
        s.push(c as u16);
    } else {
        s.push((0xd7c0 + (c >> 10)) as u16);
        s.push((0xdc00 + (c & 0x3ff)) as u16);
    }
}
