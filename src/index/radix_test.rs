use super::*;
use proptest::prelude::*;

#[test]
fn sorts_small_fixed_case() {
    let mut data = vec![5u64, 3, 9, 1, 4];
    flat_radixsort(&mut data, 9);
    assert_eq!(data, vec![1, 3, 4, 5, 9]);
}

#[test]
fn sorts_packed_token_fid_records() {
    // (token << 40) | fid, several tokens sharing fids.
    let rec = |token: u64, fid: u64| (token << 40) | fid;
    let mut data = vec![rec(2, 5), rec(1, 9), rec(1, 3), rec(0, 1)];
    flat_radixsort(&mut data, 9);
    let mut expected = data.clone();
    expected.sort_unstable();
    assert_eq!(data, expected);
}

proptest! {
    #[test]
    fn matches_std_sort_for_any_input(
        max_fileid in 0u64..(1u64 << 40),
        mut data in prop::collection::vec(0u64..u64::MAX, 0..200),
    ) {
        // Ensure records look like real (token<<40)|fid packs within
        // max_fileid, so the skip-bytes optimization is actually sound.
        for v in data.iter_mut() {
            let token = (*v >> 40) & 0xFF_FFFF;
            let fid = if max_fileid == 0 { 0 } else { *v % (max_fileid + 1) };
            *v = (token << 40) | fid;
        }
        let mut expected = data.clone();
        expected.sort_unstable();
        flat_radixsort(&mut data, max_fileid);
        prop_assert_eq!(data, expected);
    }
}
