use super::*;
use crate::ngram::IndexKind;

fn build_dataset(dir: &std::path::Path, id: &str) -> Arc<Dataset> {
    let files = vec![(std::path::PathBuf::from("/f"), b"abcdef".to_vec())];
    Arc::new(Dataset::build(dir, id, &files, &[IndexKind::Gram3]).unwrap())
}

#[test]
fn allocate_dataset_id_is_deterministic_given_seed() {
    let snap = Snapshot::empty(PathBuf::from("/tmp"), 1024, 42);
    let (id1, next1) = snap.allocate_dataset_id();
    let (id2, next2) = snap.allocate_dataset_id();
    assert_eq!(id1, id2);
    assert_eq!(next1, next2);
}

#[test]
fn different_seeds_usually_allocate_different_ids() {
    let a = Snapshot::empty(PathBuf::from("/tmp"), 1024, 1);
    let b = Snapshot::empty(PathBuf::from("/tmp"), 1024, 2);
    assert_ne!(a.allocate_dataset_id().0, b.allocate_dataset_id().0);
}

#[test]
fn with_datasets_added_appends_and_advances_seed() {
    let dir = tempfile::tempdir().unwrap();
    let snap = Snapshot::empty(dir.path().to_path_buf(), 1024, 7);
    let ds = build_dataset(dir.path(), "d1");
    let next = snap.with_datasets_added(vec![ds], 99);
    assert_eq!(next.datasets.len(), 1);
    assert_eq!(next.rng_seed_state, 99);
    assert!(next.find("d1").is_some());
}

#[test]
fn replace_datasets_drops_removed_and_adds_new() {
    let dir = tempfile::tempdir().unwrap();
    let snap = Snapshot::empty(dir.path().to_path_buf(), 1024, 7);
    let a = build_dataset(dir.path(), "a");
    let b = build_dataset(dir.path(), "b");
    let merged = snap.with_datasets_added(vec![a, b], 8);

    let c = build_dataset(dir.path(), "c");
    let compacted = merged.replace_datasets(&["a".to_string(), "b".to_string()], vec![c], 9);

    assert!(compacted.find("a").is_none());
    assert!(compacted.find("b").is_none());
    assert!(compacted.find("c").is_some());
    assert_eq!(compacted.rng_seed_state, 9);
}
