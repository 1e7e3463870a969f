use super::*;

fn c(ids: &[FileId]) -> QueryResult {
    QueryResult::Concrete(ids.to_vec())
}

#[test]
fn union_is_commutative_and_sorted() {
    let a = c(&[1, 3, 5]);
    let b = c(&[2, 3, 6]);
    assert_eq!(
        QueryResult::union(a.clone(), b.clone()),
        QueryResult::union(b, a)
    );
    assert_eq!(
        QueryResult::union(c(&[1, 3, 5]), c(&[2, 3, 6])),
        c(&[1, 2, 3, 5, 6])
    );
}

#[test]
fn intersect_is_commutative() {
    let a = c(&[1, 3, 5]);
    let b = c(&[3, 5, 7]);
    assert_eq!(
        QueryResult::intersect(a.clone(), b.clone()),
        QueryResult::intersect(b, a)
    );
    assert_eq!(QueryResult::intersect(c(&[1, 3, 5]), c(&[3, 5, 7])), c(&[3, 5]));
}

#[test]
fn union_idempotent_and_associative() {
    let a = c(&[1, 2]);
    assert_eq!(QueryResult::union(a.clone(), a.clone()), a);

    let (a, b, cc) = (c(&[1, 2]), c(&[2, 3]), c(&[3, 4]));
    let left = QueryResult::union(QueryResult::union(a.clone(), b.clone()), cc.clone());
    let right = QueryResult::union(a, QueryResult::union(b, cc));
    assert_eq!(left, right);
}

#[test]
fn everything_identities() {
    let e = QueryResult::everything();
    let v = c(&[1, 2, 3]);
    assert_eq!(QueryResult::union(e.clone(), v.clone()), QueryResult::everything());
    assert_eq!(QueryResult::intersect(e, v.clone()), v);
}

#[test]
fn min_of_zero_is_everything() {
    let sources = vec![c(&[1]), c(&[2]), c(&[3])];
    assert_eq!(QueryResult::min_of(0, sources), QueryResult::everything());
}

#[test]
fn min_of_all_is_intersection() {
    let sources = vec![c(&[1, 2, 3]), c(&[2, 3, 4]), c(&[2, 3, 5])];
    assert_eq!(QueryResult::min_of(3, sources), c(&[2, 3]));
}

#[test]
fn min_of_one_is_union() {
    let sources = vec![c(&[1, 2]), c(&[2, 3]), c(&[4])];
    assert_eq!(QueryResult::min_of(1, sources), c(&[1, 2, 3, 4]));
}

#[test]
fn min_of_too_large_k_is_empty() {
    let sources = vec![c(&[1]), c(&[2])];
    assert_eq!(QueryResult::min_of(5, sources), QueryResult::empty());
}

#[test]
fn min_of_middle_k_picks_common_members() {
    // file 2 appears in all three, file 3 in two, file 1 and 4 in one each.
    let sources = vec![c(&[1, 2, 3]), c(&[2, 3]), c(&[2, 4])];
    assert_eq!(QueryResult::min_of(2, sources), c(&[2, 3]));
}

#[test]
fn min_of_everything_source_lowers_k() {
    // one `everything` source plus k=1 over the rest means "union with one
    // less required vote", i.e. an `everything` counts toward k.
    let sources = vec![QueryResult::everything(), c(&[1, 2])];
    assert_eq!(QueryResult::min_of(2, sources), c(&[1, 2]));
}

#[test]
fn counters_accumulate() {
    let mut counters = QueryCounters::default();
    QueryCounters::time_and(Some(&mut counters), || {
        QueryResult::intersect(c(&[1, 2]), c(&[2, 3]))
    });
    QueryCounters::time_or(Some(&mut counters), || {
        QueryResult::union(c(&[1]), c(&[2]))
    });
    assert_eq!(counters.ands.count, 1);
    assert_eq!(counters.ors.count, 1);
    assert_eq!(counters.reads.count, 0);
}
