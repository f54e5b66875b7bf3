//! The processing pipeline: ASCII fast path, normalization, label
//! segmentation, and the per-label validity-and-mapping stages.

use icu_properties::{maps, GeneralCategory};
use smallvec::SmallVec;

use crate::normalize::Normalizers;
use crate::punycode;
use crate::utf16::next_code_point;
use crate::{bidi, contextj, IdnaErrors, IdnaInfo, IdnaOptions};

const HYPHEN: u16 = 0x2d;
const DOT: u16 = 0x2e;
const REPLACEMENT: u16 = 0xfffd;
const ACE_PREFIX: [u16; 4] = [0x78, 0x6e, 0x2d, 0x2d]; // "xn--"

/// Scratch buffer for one label; DNS labels fit in 63 units.
type Label = SmallVec<[u16; 64]>;

// Per-character data for the ASCII range. The UTS #46 profile maps
// uppercase ASCII letters to lowercase and passes through all other ASCII
// characters; with `USE_STD3_RULES`, non-LDH characters are disallowed
// through this table. The ASCII fast path uses the same data.
// Values: -1 disallowed, 0 valid, 1 mapped to lowercase.
#[rustfmt::skip]
const ASCII_DATA: [i8; 128] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    // 002D..002E; valid  #  HYPHEN-MINUS..FULL STOP
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,  0,  0, -1,
    // 0030..0039; valid  #  DIGIT ZERO..DIGIT NINE
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0, -1, -1, -1, -1, -1, -1,
    // 0041..005A; mapped  #  LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER Z
    -1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1, -1, -1, -1, -1, -1,
    // 0061..007A; valid  #  LATIN SMALL LETTER A..LATIN SMALL LETTER Z
    -1,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,  0,  0,  0, -1, -1, -1, -1, -1,
];

pub(crate) struct Processor<'a> {
    pub(crate) options: IdnaOptions,
    pub(crate) normalizers: &'a Normalizers,
}

impl Processor<'_> {
    pub(crate) fn process(
        &self,
        src: &[u16],
        is_label: bool,
        to_ascii: bool,
        dest: &mut Vec<u16>,
        info: &mut IdnaInfo,
    ) {
        dest.clear();
        info.reset();
        if src.is_empty() {
            info.errors |= IdnaErrors::EMPTY_LABEL;
            return;
        }
        let disallow_non_ldh_dot = self.options.contains(IdnaOptions::USE_STD3_RULES);
        let mut label_start = 0usize;
        let mut i = 0usize;
        // ASCII fast path: map and validate in place until something needs
        // the normalizer.
        loop {
            if i == src.len() {
                if to_ascii && i - label_start > 63 {
                    info.errors |= IdnaErrors::LABEL_TOO_LONG;
                }
                return;
            }
            let c = src[i];
            if c > 0x7f {
                break;
            }
            let c_data = ASCII_DATA[c as usize];
            if c_data > 0 {
                dest.push(c + 0x20); // lowercase an uppercase ASCII letter
            } else if c_data < 0 && disallow_non_ldh_dot {
                break; // replacing with U+FFFD is the Unicode path's job
            } else {
                dest.push(c);
                if c == HYPHEN {
                    if i == label_start + 3 && src[i - 1] == HYPHEN {
                        // "??--...": Punycode or forbidden.
                        break;
                    }
                    if i == label_start {
                        info.errors |= IdnaErrors::LEADING_HYPHEN;
                    }
                    if i + 1 == src.len() || src[i + 1] == DOT {
                        info.errors |= IdnaErrors::TRAILING_HYPHEN;
                    }
                } else if c == DOT {
                    if is_label {
                        break; // a dot inside a single label
                    }
                    // Permit an empty label at the end but not elsewhere.
                    if i == label_start && i + 1 < src.len() {
                        info.errors |= IdnaErrors::EMPTY_LABEL;
                    } else if to_ascii && i - label_start > 63 {
                        info.errors |= IdnaErrors::LABEL_TOO_LONG;
                    }
                    label_start = i + 1;
                }
            }
            i += 1;
        }
        // Drop whatever the broken-out-of iteration already emitted.
        dest.truncate(i);
        self.process_unicode(src, label_start, i, is_label, to_ascii, dest, info);
    }

    fn process_unicode(
        &self,
        src: &[u16],
        label_start: usize,
        mapping_start: usize,
        is_label: bool,
        to_ascii: bool,
        dest: &mut Vec<u16>,
        info: &mut IdnaInfo,
    ) {
        if mapping_start == 0 {
            *dest = self.normalizers.uts46_normalize(src);
        } else {
            self.normalizers
                .uts46_normalize_second_and_append(dest, &src[mapping_start..]);
        }
        if is_label {
            self.process_label(dest, 0, dest.len(), to_ascii, info);
            return;
        }
        let mut label_start = label_start;
        let mut label_limit = label_start;
        while label_limit < dest.len() {
            if dest[label_limit] == DOT {
                let delta =
                    self.process_label(dest, label_start, label_limit - label_start, to_ascii, info);
                label_limit = (label_limit as isize + delta + 1) as usize;
                label_start = label_limit;
            } else {
                label_limit += 1;
            }
        }
        // Permit an empty label at the end, but not an empty label elsewhere
        // nor a completely empty domain name; process_label reports
        // EMPTY_LABEL when the length is 0.
        if label_start == 0 || label_start < label_limit {
            self.process_label(dest, label_start, label_limit - label_start, to_ascii, info);
        }
    }

    /// Processes one label in place; returns the change in label length so
    /// the caller can re-seat subsequent label offsets.
    fn process_label(
        &self,
        dest: &mut Vec<u16>,
        dest_label_start: usize,
        dest_label_length: usize,
        to_ascii: bool,
        info: &mut IdnaInfo,
    ) -> isize {
        let disallow_non_ldh_dot = self.options.contains(IdnaOptions::USE_STD3_RULES);
        let mut label: Label =
            SmallVec::from_slice(&dest[dest_label_start..dest_label_start + dest_label_length]);
        let was_punycode = label.len() >= 4 && label[..4] == ACE_PREFIX;
        if was_punycode {
            match punycode::decode(&label[4..]) {
                Some(unicode) => {
                    // Check for NFC and for characters the normalizer does
                    // not pass through: any change means the ACE label did
                    // not contain the canonical form. Deviation characters
                    // pass and stay valid in Punycode even under
                    // transitional processing.
                    let from_punycode = self.normalizers.uts46_normalize(&unicode);
                    if from_punycode != unicode {
                        info.errors |= IdnaErrors::INVALID_ACE_LABEL;
                    }
                    label = SmallVec::from_vec(from_punycode);
                }
                None => {
                    info.errors |= IdnaErrors::PUNYCODE;
                    // Flag the corruption with one U+FFFD, but only if the
                    // label otherwise consists of LDH characters.
                    let mut only_ldh = true;
                    for unit in label[4..].iter_mut() {
                        let c = *unit;
                        if c <= 0x7f {
                            if c == DOT {
                                info.errors |= IdnaErrors::LABEL_HAS_DOT;
                                only_ldh = false;
                                *unit = REPLACEMENT;
                            } else if ASCII_DATA[c as usize] < 0 {
                                only_ldh = false;
                                if disallow_non_ldh_dot {
                                    *unit = REPLACEMENT;
                                }
                            }
                        } else {
                            only_ldh = false;
                        }
                    }
                    if only_ldh {
                        label.push(REPLACEMENT);
                    }
                    return replace_label(dest, dest_label_start, dest_label_length, &label);
                }
            }
        }

        // Validity checks on the mapped, normalized label.
        if label.is_empty() {
            if to_ascii {
                info.errors |= IdnaErrors::EMPTY_LABEL;
            }
            return replace_label(dest, dest_label_start, dest_label_length, &label);
        }
        if label.len() >= 4 && label[2] == HYPHEN && label[3] == HYPHEN {
            info.errors |= IdnaErrors::HYPHEN_3_4;
        }
        if label[0] == HYPHEN {
            info.errors |= IdnaErrors::LEADING_HYPHEN;
        }
        if label[label.len() - 1] == HYPHEN {
            info.errors |= IdnaErrors::TRAILING_HYPHEN;
        }
        let (first_cp, first_cp_len) = next_code_point(&label, 0);
        if is_mark(first_cp) {
            info.errors |= IdnaErrors::LEADING_COMBINING_MARK;
            label[0] = REPLACEMENT;
            if first_cp_len == 2 {
                label.remove(1);
            }
        }

        // One pass over the code units: report disallowed content, apply
        // the transitional deviation mappings, and accumulate the OR of all
        // non-ASCII units as a cheap filter for the later checks.
        let mut ored_chars: u16 = 0;
        let do_map_dev_chars = !was_punycode
            && if to_ascii {
                !self.options.contains(IdnaOptions::NONTRANSITIONAL_TO_ASCII)
            } else {
                !self.options.contains(IdnaOptions::NONTRANSITIONAL_TO_UNICODE)
            };
        let mut did_map_dev_chars = false;
        let mut k = 0usize;
        while k < label.len() {
            let c = label[k];
            if c <= 0x7f {
                if c == DOT {
                    info.errors |= IdnaErrors::LABEL_HAS_DOT;
                    label[k] = REPLACEMENT;
                } else if disallow_non_ldh_dot && ASCII_DATA[c as usize] < 0 {
                    info.errors |= IdnaErrors::DISALLOWED;
                    if was_punycode {
                        info.errors |= IdnaErrors::INVALID_ACE_LABEL;
                    }
                    label[k] = REPLACEMENT;
                }
            } else {
                ored_chars |= c;
                match c {
                    0xdf => {
                        // Sharp s maps to "ss" under transitional processing.
                        info.has_dev_chars = true;
                        if do_map_dev_chars {
                            did_map_dev_chars = true;
                            label[k] = 0x73;
                            label.insert(k + 1, 0x73);
                            k += 1;
                        }
                    }
                    0x3c2 => {
                        // Final sigma maps to nonfinal sigma.
                        info.has_dev_chars = true;
                        if do_map_dev_chars {
                            did_map_dev_chars = true;
                            label[k] = 0x3c3;
                        }
                    }
                    0x200c | 0x200d => {
                        // ZWNJ/ZWJ are removed.
                        info.has_dev_chars = true;
                        if do_map_dev_chars {
                            did_map_dev_chars = true;
                            label.remove(k);
                            continue;
                        }
                    }
                    REPLACEMENT => {
                        info.errors |= IdnaErrors::DISALLOWED;
                    }
                    _ => {}
                }
            }
            k += 1;
        }
        if did_map_dev_chars {
            // Mapping deviation characters can leave the label un-NFC.
            label = SmallVec::from_vec(self.normalizers.nfc_normalize(&label));
            // The mapping may also have removed the last non-ASCII unit
            // (sharp s to "ss", joiners dropped), so the filter has to be
            // rebuilt from the label as it now stands.
            ored_chars = label
                .iter()
                .fold(0, |ored, &c| if c > 0x7f { ored | c } else { ored });
        }
        if self.options.contains(IdnaOptions::CHECK_BIDI)
            && ored_chars >= 0x590
            && !bidi::is_label_ok_bidi(&label)
        {
            info.errors |= IdnaErrors::BIDI;
        }
        if self.options.contains(IdnaOptions::CHECK_CONTEXTJ)
            && (ored_chars & 0x200c) == 0x200c
            && !contextj::is_label_ok_context_j(&label)
        {
            info.errors |= IdnaErrors::CONTEXTJ;
        }
        if to_ascii {
            if was_punycode && !did_map_dev_chars && info.errors.is_empty() {
                // A valid, untouched ACE label stays as it arrived.
                // Checking the error set rather than tracking "was
                // modified" precisely is simpler and safe, at the cost of
                // re-encoding when an error in another label did not touch
                // this one.
                if dest_label_length > 63 {
                    info.errors |= IdnaErrors::LABEL_TOO_LONG;
                }
                return 0;
            }
            if was_punycode || ored_chars >= 0x80 {
                match punycode::encode(&label) {
                    Some(encoded) => {
                        let mut ace: Label = SmallVec::from_slice(&ACE_PREFIX);
                        ace.extend_from_slice(&encoded);
                        if ace.len() > 63 {
                            info.errors |= IdnaErrors::LABEL_TOO_LONG;
                        }
                        return replace_label(dest, dest_label_start, dest_label_length, &ace);
                    }
                    None => {
                        // Encoding overflows only far beyond the label limit.
                        info.errors |= IdnaErrors::LABEL_TOO_LONG;
                    }
                }
            }
        }
        replace_label(dest, dest_label_start, dest_label_length, &label)
    }
}

/// Splices the processed label back over its slice of the destination;
/// returns the length delta.
fn replace_label(dest: &mut Vec<u16>, start: usize, old_length: usize, label: &[u16]) -> isize {
    dest.splice(start..start + old_length, label.iter().copied());
    label.len() as isize - old_length as isize
}

fn is_mark(c: u32) -> bool {
    matches!(
        maps::general_category().get32(c),
        GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
    )
}
