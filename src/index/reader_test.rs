use super::*;
use crate::index::builder::{FlatIndexBuilder, IndexBuilder};

fn build(dir: &std::path::Path, kind: IndexKind, files: &[(FileId, &[u8])]) -> std::path::PathBuf {
    let path = dir.join(format!("{}.ursa", kind.name()));
    let mut b = FlatIndexBuilder::new(kind);
    for (fid, bytes) in files {
        b.add_file(*fid, bytes);
    }
    b.save(&path).unwrap();
    path
}

#[test]
fn open_rejects_bad_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.ursa");
    std::fs::write(&path, vec![0u8; (HEADER_SIZE + (NUM_TOKENS + 1) * 8) as usize]).unwrap();

    match IndexReader::open(&path) {
        Err(Error::InvalidFile(_)) => {}
        other => panic!("expected InvalidFile, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn open_rejects_truncated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.ursa");
    std::fs::write(&path, vec![0u8; 32]).unwrap();

    match IndexReader::open(&path) {
        Err(Error::InvalidFile(_)) => {}
        other => panic!("expected InvalidFile, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn query_literal_intersects_across_windows() {
    let dir = tempfile::tempdir().unwrap();
    let path = build(
        dir.path(),
        IndexKind::Gram3,
        &[(1, b"hello world"), (2, b"hello there"), (3, b"goodbye world")],
    );
    let r = IndexReader::open(&path).unwrap();

    let hits = r.query_literal(b"hello").unwrap();
    assert_eq!(hits.ids(), &[1, 2]);

    let hits = r.query_literal(b"world").unwrap();
    assert_eq!(hits.ids(), &[1, 3]);

    let hits = r.query_literal(b"nowhere").unwrap();
    assert!(hits.is_empty());
}

#[test]
fn query_literal_shorter_than_window_is_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = build(dir.path(), IndexKind::Hash4, &[(1, b"abcdefgh")]);
    let r = IndexReader::open(&path).unwrap();

    assert!(r.query_literal(b"ab").unwrap().is_everything());
}

#[test]
fn postings_out_of_range_offsets_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = build(dir.path(), IndexKind::Gram3, &[(1, b"abcdef")]);

    // Corrupt the first offset table entry with an out-of-bounds value.
    let mut bytes = std::fs::read(&path).unwrap();
    let base = (bytes.len() as u64 - (NUM_TOKENS + 1) * 8) as usize;
    bytes[base..base + 8].copy_from_slice(&(bytes.len() as u64 + 1_000).to_le_bytes());
    std::fs::write(&path, &bytes).unwrap();

    let r = IndexReader::open(&path).unwrap();
    match r.postings(0) {
        Err(Error::InvalidFile(_)) => {}
        other => panic!("expected InvalidFile, got {:?}", other.map(|_| ())),
    }
}
