use super::*;

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("d1.manifest.json");

    let m = Manifest {
        id: "d1".to_string(),
        indexes: vec![("gram3".to_string(), "d1.gram3.ursa".to_string())],
        files: vec!["/a/b.txt".to_string(), "/a/c.txt".to_string()],
    };
    m.save(&path).unwrap();

    let loaded = Manifest::load(&path).unwrap();
    assert_eq!(loaded.id, "d1");
    assert_eq!(loaded.path_for(1), Some("/a/b.txt"));
    assert_eq!(loaded.path_for(2), Some("/a/c.txt"));
    assert_eq!(loaded.path_for(3), None);
    assert_eq!(loaded.path_for(0), None);
}

#[test]
fn kinds_parses_back_index_kind_names() {
    let m = Manifest {
        id: "d1".to_string(),
        indexes: vec![
            ("gram3".to_string(), "d1.gram3.ursa".to_string()),
            ("hash4".to_string(), "d1.hash4.ursa".to_string()),
        ],
        files: vec![],
    };
    let kinds = m.kinds().unwrap();
    assert_eq!(kinds, vec![IndexKind::Gram3, IndexKind::Hash4]);
}
