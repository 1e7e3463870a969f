use super::*;
use crate::index::reader::IndexReader;
use crate::ngram::IndexKind;

#[test]
fn can_still_add_respects_buffer_budget() {
    let b = FlatIndexBuilder::new(IndexKind::Gram3);
    assert!(b.can_still_add(1_000));
}

#[test]
fn empty_builder_is_empty() {
    let b = FlatIndexBuilder::new(IndexKind::Gram3);
    assert!(b.is_empty());
}

#[test]
fn add_file_marks_builder_nonempty_and_tracks_max_fileid() {
    let mut b = FlatIndexBuilder::new(IndexKind::Gram3);
    b.add_file(7, b"abcdef");
    assert!(!b.is_empty());
    assert_eq!(b.max_fileid, 7);
}

#[test]
fn short_file_contributes_no_tokens() {
    let mut b = FlatIndexBuilder::new(IndexKind::Gram3);
    b.add_file(1, b"ab");
    assert!(b.is_empty());
}

#[test]
fn save_then_reopen_round_trips_postings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.ursa");

    let mut b = FlatIndexBuilder::new(IndexKind::Gram3);
    b.add_file(1, b"abcabc");
    b.add_file(2, b"xyzabc");
    b.save(&path).unwrap();

    let r = IndexReader::open(&path).unwrap();
    assert_eq!(r.kind(), IndexKind::Gram3);

    let tok = crate::ngram::gram3_pack(b"abc");
    let got = r.postings(tok).unwrap();
    assert_eq!(got, vec![1, 2]);
}

#[test]
fn lowest_token_with_postings_does_not_absorb_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t2.ursa");

    // Every token below gram3("abc") has no postings at all, so this
    // exercises the offsets[1..=first_token] fill on the very first record.
    let mut b = FlatIndexBuilder::new(IndexKind::Gram3);
    b.add_file(1, b"abcabc");
    b.save(&path).unwrap();

    let r = IndexReader::open(&path).unwrap();
    let tok = crate::ngram::gram3_pack(b"abc");
    assert_eq!(r.postings(tok).unwrap(), vec![1]);
    assert_eq!(r.postings(0).unwrap(), Vec::<u64>::new());
    assert_eq!(r.postings(tok - 1).unwrap(), Vec::<u64>::new());
}

#[test]
fn can_still_add_refuses_when_buffer_would_overflow() {
    let mut b = FlatIndexBuilder::new(IndexKind::Gram3);
    // Push records directly to simulate a near-full buffer without
    // allocating MAX_TOKENS_BUFFER real records.
    b.raw = vec![0u64; (MAX_TOKENS_BUFFER - 1) as usize];
    assert!(b.can_still_add(2));
    assert!(!b.can_still_add(3));
}

#[test]
fn save_refuses_to_overwrite_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.ursa");
    std::fs::write(&path, b"occupied").unwrap();

    let mut b = FlatIndexBuilder::new(IndexKind::Gram3);
    b.add_file(1, b"abcdef");
    match b.save(&path) {
        Err(Error::IoError(_)) => {}
        other => panic!("expected IoError, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn save_on_empty_builder_still_produces_a_valid_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.ursa");

    let mut b = FlatIndexBuilder::new(IndexKind::Hash4);
    b.save(&path).unwrap();

    let r = IndexReader::open(&path).unwrap();
    assert_eq!(r.kind(), IndexKind::Hash4);
    assert_eq!(r.postings(0).unwrap(), Vec::<u64>::new());
    assert_eq!(r.postings((1 << 24) - 1).unwrap(), Vec::<u64>::new());
}
