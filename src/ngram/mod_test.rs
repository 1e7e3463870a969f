use super::*;

#[test]
fn short_literal_escape() {
    assert!(IndexKind::Gram3.tokens_for_literal(b"ab").is_empty());
    assert!(!IndexKind::Gram3.tokens_for_literal(b"abc").is_empty());

    assert!(IndexKind::Text4.tokens_for_literal(b"abc").is_empty());
    assert!(!IndexKind::Text4.tokens_for_literal(b"abcd").is_empty());

    assert!(IndexKind::Hash4.tokens_for_literal(b"abc").is_empty());
    assert!(!IndexKind::Hash4.tokens_for_literal(b"abcd").is_empty());
}

#[test]
fn kind_name_roundtrip() {
    for kind in ALL_KINDS {
        assert_eq!(IndexKind::parse_name(kind.name()).unwrap(), kind);
        assert_eq!(IndexKind::from_u32(kind.as_u32()).unwrap(), kind);
    }
}

#[test]
fn tokens_for_literal_dedups_and_sorts() {
    // "aaaa" under gram3 repeats the same trigram.
    let tokens = IndexKind::Gram3.tokens_for_literal(b"aaaa");
    assert_eq!(tokens.len(), 1);
}
