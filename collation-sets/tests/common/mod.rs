//! Builders for small test collation tables.

use collation_sets::{Ce32Map, CollationData};
use zerovec::ZeroVec;

/// Serializes a small chars trie in the `Char16Trie` unit format.
///
/// Entries must be sorted, with non-empty keys and pairwise distinct first
/// units; at most five entries (one linear branch list). Multi-unit keys
/// continue through a jump delta, or inline when they sort last.
pub fn encode_trie(entries: &[(&[u16], u32)]) -> Vec<u16> {
    assert!(!entries.is_empty() && entries.len() <= 5);
    for pair in entries.windows(2) {
        assert!(pair[0].0 < pair[1].0, "entries must be sorted");
        assert_ne!(pair[0].0[0], pair[1].0[0], "first units must be distinct");
    }
    if entries.len() == 1 {
        let (key, value) = entries[0];
        let mut out = encode_linear(key);
        out.extend(encode_final(value));
        return out;
    }

    let n = entries.len();
    let (last_key, last_value) = entries[n - 1];
    let last_cont = continuation(&last_key[1..], last_value);

    // Fixed-size slots make the layout computable in one pass: a final value
    // for single-unit keys, a one-unit jump delta otherwise.
    let slot_size = |key: &[u16], value: u32| {
        if key.len() == 1 {
            encode_final(value).len()
        } else {
            1
        }
    };
    let list_len: usize = 1
        + entries[..n - 1]
            .iter()
            .map(|&(key, value)| 1 + slot_size(key, value))
            .sum::<usize>()
        + 1
        + last_cont.len();

    let continuations: Vec<Vec<u16>> = entries[..n - 1]
        .iter()
        .filter(|(key, _)| key.len() > 1)
        .map(|&(key, value)| continuation(&key[1..], value))
        .collect();
    let mut cont_positions = Vec::new();
    let mut pos = list_len;
    for cont in &continuations {
        cont_positions.push(pos);
        pos += cont.len();
    }

    let mut out = vec![(n - 1) as u16];
    let mut cont_index = 0;
    for &(key, value) in &entries[..n - 1] {
        out.push(key[0]);
        if key.len() == 1 {
            out.extend(encode_final(value));
        } else {
            let delta = cont_positions[cont_index] - out.len() - 1;
            assert!(delta < 0x4000);
            out.push(delta as u16);
            cont_index += 1;
        }
    }
    out.push(last_key[0]);
    out.extend(last_cont);
    for cont in continuations {
        out.extend(cont);
    }
    assert_eq!(out.len(), pos);
    out
}

fn continuation(rest: &[u16], value: u32) -> Vec<u16> {
    let mut out = encode_linear(rest);
    out.extend(encode_final(value));
    out
}

fn encode_linear(units: &[u16]) -> Vec<u16> {
    if units.is_empty() {
        return Vec::new();
    }
    assert!(units.len() <= 0x10);
    let mut out = vec![0x30 + (units.len() as u16 - 1)];
    out.extend_from_slice(units);
    out
}

fn encode_final(value: u32) -> Vec<u16> {
    if value <= 0x3fff {
        vec![0x8000 | value as u16]
    } else if value <= 0x3ffe_ffff {
        vec![0x8000 | (0x4000 + (value >> 16)) as u16, value as u16]
    } else {
        vec![0xffff, (value >> 16) as u16, value as u16]
    }
}

/// A context entry: the default CE32 split across two units, then the trie.
pub fn context(default_ce32: u32, trie: &[u16]) -> Vec<u16> {
    let mut out = vec![(default_ce32 >> 16) as u16, default_ce32 as u16];
    out.extend_from_slice(trie);
    out
}

pub struct TableSpec<'a> {
    pub ranges: &'a [(u32, u32, u32)],
    pub default: u32,
    pub ce32s: &'a [u32],
    pub ces: &'a [u64],
    pub contexts: &'a [u16],
    pub jamo_ces: &'a [u64],
}

impl Default for TableSpec<'_> {
    fn default() -> Self {
        TableSpec {
            ranges: &[],
            default: 1,
            ce32s: &[0],
            ces: &[],
            contexts: &[],
            jamo_ces: &[],
        }
    }
}

pub fn make_data<'a>(
    spec: &TableSpec<'_>,
    base: Option<&'a CollationData<'a>>,
) -> CollationData<'a> {
    CollationData {
        ce32_map: Ce32Map::from_ranges(spec.ranges, spec.default).unwrap(),
        ce32s: ZeroVec::alloc_from_slice(spec.ce32s),
        ces: ZeroVec::alloc_from_slice(spec.ces),
        contexts: ZeroVec::alloc_from_slice(spec.contexts),
        jamo_ces: ZeroVec::alloc_from_slice(spec.jamo_ces),
        base,
    }
}

/// 19 + 21 + 27 jamo CEs with distinct values.
pub fn default_jamo_ces() -> Vec<u64> {
    (0..67).map(|i| 0x1000 + i as u64).collect()
}
