use uts46::{IdnaErrors, IdnaInfo, IdnaOptions, Uts46};

fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn to_ascii(options: IdnaOptions, name: &str) -> (String, IdnaInfo) {
    Uts46::new(options).name_to_ascii_str(name)
}

fn to_unicode(options: IdnaOptions, name: &str) -> (String, IdnaInfo) {
    Uts46::new(options).name_to_unicode_str(name)
}

#[test]
fn ascii_fast_path_passes_ldh_through() {
    let (out, info) = to_ascii(IdnaOptions::default(), "fass.de");
    assert!(!info.has_errors());
    assert!(!info.has_dev_chars());
    assert_eq!(out, "fass.de");
}

#[test]
fn ascii_fast_path_lowercases() {
    let (out, info) = to_ascii(IdnaOptions::default(), "ExAmPlE.COM");
    assert!(!info.has_errors());
    assert_eq!(out, "example.com");
}

#[test]
fn transitional_maps_sharp_s() {
    let (out, info) = to_ascii(IdnaOptions::default(), "faß.de");
    assert!(!info.has_errors());
    assert!(info.has_dev_chars());
    assert!(info.is_transitional_different());
    assert_eq!(out, "fass.de");
}

#[test]
fn nontransitional_preserves_sharp_s() {
    let (out, info) = to_ascii(IdnaOptions::NONTRANSITIONAL_TO_ASCII, "faß.de");
    assert!(!info.has_errors());
    assert!(info.has_dev_chars());
    assert_eq!(out, "xn--fa-hia.de");
}

#[test]
fn to_unicode_decodes_punycode() {
    let (out, info) = to_unicode(IdnaOptions::NONTRANSITIONAL_TO_UNICODE, "xn--fa-hia.de");
    assert!(!info.has_errors());
    assert_eq!(out, "faß.de");
}

#[test]
fn valid_ace_labels_are_left_alone_by_to_ascii() {
    let (out, info) = to_ascii(IdnaOptions::default(), "xn--fa-hia.de");
    assert!(!info.has_errors());
    assert_eq!(out, "xn--fa-hia.de");
}

#[test]
fn final_sigma_maps_transitionally() {
    let (out, info) = to_unicode(IdnaOptions::default(), "νσς.gr");
    assert!(!info.has_errors());
    assert!(info.has_dev_chars());
    assert_eq!(out, "νσσ.gr");
}

#[test]
fn leading_hyphen_in_any_label_is_reported() {
    let (out, info) = to_ascii(IdnaOptions::default(), "a.-b.c");
    assert!(info.errors().contains(IdnaErrors::LEADING_HYPHEN));
    assert!(out.is_empty());
}

#[test]
fn hyphen_rules_on_the_fast_path() {
    let (_, info) = to_ascii(IdnaOptions::default(), "-a.de");
    assert!(info.errors().contains(IdnaErrors::LEADING_HYPHEN));
    let (_, info) = to_ascii(IdnaOptions::default(), "a-.de");
    assert!(info.errors().contains(IdnaErrors::TRAILING_HYPHEN));
    let (_, info) = to_ascii(IdnaOptions::default(), "ab--cd.de");
    assert!(info.errors().contains(IdnaErrors::HYPHEN_3_4));
}

#[test]
fn invalid_punycode_is_reported_and_marked() {
    let (out, info) = to_ascii(IdnaOptions::default(), "xn--0.de");
    assert!(info.errors().contains(IdnaErrors::PUNYCODE));
    assert!(out.is_empty());
    // to_unicode keeps the label, flagged with one U+FFFD.
    let (out, info) = to_unicode(IdnaOptions::default(), "xn--0.de");
    assert!(info.errors().contains(IdnaErrors::PUNYCODE));
    assert_eq!(out, "xn--0\u{fffd}.de");
}

#[test]
fn empty_labels_are_reported() {
    let (_, info) = to_ascii(IdnaOptions::default(), "");
    assert!(info.errors().contains(IdnaErrors::EMPTY_LABEL));
    let (_, info) = to_ascii(IdnaOptions::default(), "a..b");
    assert!(info.errors().contains(IdnaErrors::EMPTY_LABEL));
    // A trailing empty label (root dot) is fine.
    let (out, info) = to_ascii(IdnaOptions::default(), "a.b.");
    assert!(!info.has_errors());
    assert_eq!(out, "a.b.");
}

#[test]
fn label_length_is_checked_in_to_ascii() {
    let long = "a".repeat(64);
    let (_, info) = to_ascii(IdnaOptions::default(), &format!("{long}.de"));
    assert!(info.errors().contains(IdnaErrors::LABEL_TOO_LONG));
    let ok = "a".repeat(63);
    let (_, info) = to_ascii(IdnaOptions::default(), &format!("{ok}.de"));
    assert!(!info.has_errors());
}

#[test]
fn domain_name_length_is_checked_in_to_ascii() {
    let label63 = "a".repeat(63);
    // 63+63+63+62 code units plus three dots: 254 without a trailing dot.
    let too_long = format!("{label63}.{label63}.{label63}.{}", "a".repeat(62));
    let (_, info) = to_ascii(IdnaOptions::default(), &too_long);
    assert!(info.errors().contains(IdnaErrors::DOMAIN_NAME_TOO_LONG));
    // 253 plus the root dot is exactly 254 and allowed.
    let with_root_dot = format!("{label63}.{label63}.{label63}.{}.", "a".repeat(61));
    let (_, info) = to_ascii(IdnaOptions::default(), &with_root_dot);
    assert!(!info.has_errors());
}

#[test]
fn leading_combining_mark_is_replaced() {
    let (out, info) = to_unicode(IdnaOptions::default(), "\u{0301}abc.de");
    assert!(info.errors().contains(IdnaErrors::LEADING_COMBINING_MARK));
    assert!(info.errors().contains(IdnaErrors::DISALLOWED));
    assert_eq!(out, "\u{fffd}abc.de");
}

#[test]
fn std3_restricts_ascii() {
    let (out, info) = to_ascii(IdnaOptions::default(), "a_b.de");
    assert!(!info.has_errors());
    assert_eq!(out, "a_b.de");
    let (_, info) = to_ascii(IdnaOptions::USE_STD3_RULES, "a_b.de");
    assert!(info.errors().contains(IdnaErrors::DISALLOWED));
}

#[test]
fn disallowed_characters_become_replacement_in_to_unicode() {
    let (out, info) = to_unicode(IdnaOptions::default(), "a\u{0080}b.de");
    assert!(info.errors().contains(IdnaErrors::DISALLOWED));
    assert_eq!(out, "a\u{fffd}b.de");
}

#[test]
fn bidi_rule_accepts_clean_rtl_and_rejects_mixed_labels() {
    let uts46 = Uts46::new(IdnaOptions::CHECK_BIDI);
    // Arabic "ليه.example".
    let name: Vec<u16> = [0x0644u32, 0x064a, 0x0647]
        .iter()
        .map(|&c| c as u16)
        .chain(utf16(".example"))
        .collect();
    let mut ascii = Vec::new();
    let mut info = IdnaInfo::default();
    uts46.name_to_ascii(&name, &mut ascii, &mut info);
    assert!(!info.has_errors(), "errors: {:?}", info.errors());
    assert!(String::from_utf16(&ascii).unwrap().starts_with("xn--"));
    // Round trip.
    let mut unicode = Vec::new();
    uts46.name_to_unicode(&ascii, &mut unicode, &mut info);
    assert!(!info.has_errors());
    assert_eq!(unicode, name);

    // An L character inside an RTL label breaks the rule.
    let (_, info) = to_ascii(IdnaOptions::CHECK_BIDI, "\u{05d0}a\u{05d1}.de");
    assert!(info.errors().contains(IdnaErrors::BIDI));
}

#[test]
fn bidi_check_is_skipped_without_the_option() {
    let (_, info) = to_ascii(IdnaOptions::default(), "\u{05d0}a\u{05d1}.de");
    assert!(!info.errors().contains(IdnaErrors::BIDI));
}

#[test]
fn contextj_checks_joiner_contexts() {
    let options = IdnaOptions::CHECK_CONTEXTJ
        | IdnaOptions::NONTRANSITIONAL_TO_ASCII
        | IdnaOptions::NONTRANSITIONAL_TO_UNICODE;
    // ZWNJ between dual-joining Arabic letters is legitimate.
    let (out, info) = to_ascii(options, "\u{0628}\u{200c}\u{0628}.de");
    assert!(!info.has_errors(), "errors: {:?}", info.errors());
    assert!(out.starts_with("xn--"));
    // ZWNJ between Latin letters is not.
    let (_, info) = to_ascii(options, "a\u{200c}b.de");
    assert!(info.errors().contains(IdnaErrors::CONTEXTJ));
    // Transitional processing removes the joiner before the check instead.
    let (out, info) = to_ascii(IdnaOptions::CHECK_CONTEXTJ, "a\u{200c}b.de");
    assert!(!info.has_errors());
    assert_eq!(out, "ab.de");
}

#[test]
fn to_ascii_is_idempotent() {
    for name in ["faß.de", "ExAmPle.COM", "bücher.example", "ليه.example"] {
        let (once, info) = to_ascii(IdnaOptions::default(), name);
        assert!(!info.has_errors());
        let (twice, info) = to_ascii(IdnaOptions::default(), &once);
        assert!(!info.has_errors());
        assert_eq!(once, twice, "{name}");
    }
}

#[test]
fn to_unicode_of_to_ascii_matches_to_unicode() {
    for name in ["faß.de", "Bücher.example", "νσς.gr"] {
        let (ascii, info) = to_ascii(IdnaOptions::default(), name);
        assert!(!info.has_errors());
        let (via_ascii, _) = to_unicode(IdnaOptions::default(), &ascii);
        let (direct, _) = to_unicode(IdnaOptions::default(), name);
        assert_eq!(via_ascii, direct, "{name}");
    }
}

#[test]
fn ace_labels_in_successful_to_ascii_output_are_ascii() {
    for name in ["faß.de", "bücher.example", "日本語.jp", "ليه.example"] {
        let (ascii, info) = to_ascii(IdnaOptions::default(), name);
        assert!(!info.has_errors());
        assert!(ascii.is_ascii(), "{name} -> {ascii}");
        for label in ascii.split('.') {
            assert!(label.len() <= 63);
        }
    }
}

#[test]
fn single_label_entry_points_reject_dots() {
    let uts46 = Uts46::new(IdnaOptions::default());
    let (_, info) = uts46.label_to_ascii_str("a.b");
    assert!(info.errors().contains(IdnaErrors::LABEL_HAS_DOT));
    let (out, info) = uts46.label_to_ascii_str("bücher");
    assert!(!info.has_errors());
    assert_eq!(out, "xn--bcher-kva");
}

#[test]
fn info_is_reset_between_calls() {
    let uts46 = Uts46::new(IdnaOptions::default());
    let mut dest = Vec::new();
    let mut info = IdnaInfo::default();
    uts46.name_to_ascii(&utf16("-bad-.de"), &mut dest, &mut info);
    assert!(info.has_errors());
    uts46.name_to_ascii(&utf16("good.de"), &mut dest, &mut info);
    assert!(!info.has_errors());
    assert_eq!(String::from_utf16(&dest).unwrap(), "good.de");
}
