use super::*;
use proptest::prelude::*;

#[test]
fn empty_run_roundtrips() {
    let ids: Vec<FileId> = vec![];
    assert_eq!(decode_run(&encode_run(&ids)).unwrap(), ids);
}

#[test]
fn single_id_roundtrips() {
    let ids = vec![1u64];
    assert_eq!(decode_run(&encode_run(&ids)).unwrap(), ids);
}

#[test]
fn varint_multi_byte() {
    let mut out = Vec::new();
    write_varint(&mut out, 300);
    let (v, n) = read_varint(&out).unwrap();
    assert_eq!(v, 300);
    assert_eq!(n, out.len());
}

fn ascending_ids() -> impl Strategy<Value = Vec<FileId>> {
    prop::collection::vec(1u64..(1u64 << 40), 0..64).prop_map(|mut v| {
        v.sort_unstable();
        v.dedup();
        v
    })
}

proptest! {
    #[test]
    fn roundtrip_any_ascending_40bit_ids(ids in ascending_ids()) {
        let encoded = encode_run(&ids);
        let decoded = decode_run(&encoded).unwrap();
        prop_assert_eq!(decoded, ids);
    }
}
