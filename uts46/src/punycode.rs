//! Punycode (RFC 3492) for DNS labels.
//!
//! Bootstring with the Punycode parameters. Both directions work on UTF-16
//! code units since that is what the processor carries around; internally
//! the delta state machine runs over code points. `None` means malformed
//! input or overflow; overflow can only happen on inputs that would exceed
//! the 63-unit DNS label limit anyway.

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;
const DELIMITER: u16 = b'-' as u16;

/// Bias adaptation after each delta.
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

fn digit_value(unit: u16) -> Option<u32> {
    match unit {
        u @ 0x30..=0x39 => Some(u as u32 - 0x30 + 26), // '0'..='9'
        u @ 0x41..=0x5a => Some(u as u32 - 0x41),      // 'A'..='Z'
        u @ 0x61..=0x7a => Some(u as u32 - 0x61),      // 'a'..='z'
        _ => None,
    }
}

fn value_to_digit(value: u32) -> u16 {
    if value < 26 {
        value as u16 + b'a' as u16
    } else {
        value as u16 - 26 + b'0' as u16
    }
}

/// Decodes a Punycode label body (everything after the ACE prefix).
pub(crate) fn decode(input: &[u16]) -> Option<Vec<u16>> {
    if input.iter().any(|&unit| unit > 0x7f) {
        return None;
    }
    // Basic code points are encoded as-is before the last delimiter, if any.
    let (mut output, input): (Vec<u32>, &[u16]) = match input.iter().rposition(|&u| u == DELIMITER)
    {
        None => (Vec::new(), input),
        Some(position) => (
            input[..position].iter().map(|&u| u as u32).collect(),
            if position > 0 { &input[position + 1..] } else { input },
        ),
    };
    let mut code_point = INITIAL_N;
    let mut bias = INITIAL_BIAS;
    let mut i = 0u32;
    let mut iter = input.iter().copied();
    loop {
        let previous_i = i;
        let mut weight = 1u32;
        let mut k = BASE;
        let mut unit = match iter.next() {
            None => break,
            Some(unit) => unit,
        };
        // Decode a generalized variable-length integer into a delta on i.
        loop {
            let digit = digit_value(unit)?;
            if digit > (u32::MAX - i) / weight {
                return None; // overflow
            }
            i += digit * weight;
            let t = if k <= bias {
                T_MIN
            } else if k >= bias + T_MAX {
                T_MAX
            } else {
                k - bias
            };
            if digit < t {
                break;
            }
            if weight > u32::MAX / (BASE - t) {
                return None; // overflow
            }
            weight *= BASE - t;
            k += BASE;
            unit = iter.next()?; // end of input inside a delta
        }
        let length = output.len() as u32;
        bias = adapt(i - previous_i, length + 1, previous_i == 0);
        if i / (length + 1) > u32::MAX - code_point {
            return None; // overflow
        }
        // i wraps around from length+1 to 0, incrementing code_point.
        code_point += i / (length + 1);
        i %= length + 1;
        if code_point > 0x10_ffff || (0xd800..=0xdfff).contains(&code_point) {
            return None;
        }
        output.insert(i as usize, code_point);
        i += 1;
    }
    let mut units = Vec::with_capacity(output.len());
    for c in output {
        append_code_point(&mut units, c);
    }
    Some(units)
}

/// Encodes a label into a Punycode body (without the ACE prefix).
pub(crate) fn encode(input: &[u16]) -> Option<Vec<u16>> {
    let input = code_points(input);
    // Basic code points are encoded as-is.
    let mut output: Vec<u16> = input
        .iter()
        .filter(|&&c| c < INITIAL_N)
        .map(|&c| c as u16)
        .collect();
    let basic_length = output.len() as u32;
    if basic_length > 0 {
        output.push(DELIMITER);
    }
    let mut code_point = INITIAL_N;
    let mut delta = 0u32;
    let mut bias = INITIAL_BIAS;
    let mut processed = basic_length;
    let input_length = input.len() as u32;
    while processed < input_length {
        // All code points below `code_point` are done; find the next one up.
        let min_code_point = input.iter().copied().filter(|&c| c >= code_point).min()?;
        if min_code_point - code_point > (u32::MAX - delta) / (processed + 1) {
            return None; // overflow
        }
        // Advance the decoder's <code_point, i> state to <min_code_point, 0>.
        delta += (min_code_point - code_point) * (processed + 1);
        code_point = min_code_point;
        for &c in &input {
            if c < code_point {
                delta += 1;
                if delta == 0 {
                    return None; // overflow
                }
            }
            if c == code_point {
                // Represent delta as a generalized variable-length integer.
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = if k <= bias {
                        T_MIN
                    } else if k >= bias + T_MAX {
                        T_MAX
                    } else {
                        k - bias
                    };
                    if q < t {
                        break;
                    }
                    output.push(value_to_digit(t + ((q - t) % (BASE - t))));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(value_to_digit(q));
                bias = adapt(delta, processed + 1, processed == basic_length);
                delta = 0;
                processed += 1;
            }
        }
        delta += 1;
        code_point += 1;
    }
    Some(output)
}

fn code_points(units: &[u16]) -> Vec<u32> {
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let (c, next) = crate::utf16::next_code_point(units, i);
        out.push(c);
        i = next;
    }
    out
}

fn append_code_point(units: &mut Vec<u16>, c: u32) {
    if c <= 0xffff {
        units.push(c as u16);
    } else {
        units.push((0xd7c0 + (c >> 10)) as u16);
        units.push((0xdc00 + (c & 0x3ff)) as u16);
    }
}
