//! The `QueryResult` set algebra (§4.F): `everything` / sorted vector,
//! with union, intersection and k-of-n (`min_of`).
//!
//! Grounded directly on `libursa/QueryResult.cpp`'s `do_or`, `do_and` and
//! `do_min_of_real` — the merge/`min_of` shapes here mirror that file's
//! control flow, translated to owned `Vec<FileId>` rather than in/out
//! pointers.

use std::time::{Duration, Instant};

use super::FileId;

/// Either "no constraint derivable" (`everything`) or a concrete, sorted,
/// deduplicated set of file ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResult {
    Everything,
    Concrete(Vec<FileId>),
}

impl QueryResult {
    pub fn everything() -> QueryResult {
        QueryResult::Everything
    }

    pub fn empty() -> QueryResult {
        QueryResult::Concrete(Vec::new())
    }

    pub fn from_sorted(ids: Vec<FileId>) -> QueryResult {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be ascending and unique");
        QueryResult::Concrete(ids)
    }

    pub fn is_everything(&self) -> bool {
        matches!(self, QueryResult::Everything)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryResult::Concrete(v) if v.is_empty())
    }

    /// Concrete ids, or an empty slice for `Everything` (callers that need
    /// to distinguish "no files" from "every file" must check
    /// [`is_everything`] first).
    pub fn ids(&self) -> &[FileId] {
        match self {
            QueryResult::Everything => &[],
            QueryResult::Concrete(v) => v,
        }
    }

    pub fn union(a: QueryResult, b: QueryResult) -> QueryResult {
        match (a, b) {
            (QueryResult::Everything, _) | (_, QueryResult::Everything) => QueryResult::Everything,
            (QueryResult::Concrete(a), QueryResult::Concrete(b)) => {
                QueryResult::Concrete(merge_union(&a, &b))
            }
        }
    }

    pub fn intersect(a: QueryResult, b: QueryResult) -> QueryResult {
        match (a, b) {
            (QueryResult::Everything, other) | (other, QueryResult::Everything) => other,
            (QueryResult::Concrete(a), QueryResult::Concrete(b)) => {
                QueryResult::Concrete(merge_intersect(&a, &b))
            }
        }
    }

    /// k-of-n: a file id matches if it appears in at least `k` of
    /// `sources`. See §4.F for the full case analysis.
    pub fn min_of(k: i64, sources: Vec<QueryResult>) -> QueryResult {
        let mut k = k;
        let mut nontrivial: Vec<Vec<FileId>> = Vec::with_capacity(sources.len());
        for src in sources {
            match src {
                QueryResult::Everything => k -= 1,
                QueryResult::Concrete(v) if v.is_empty() => {}
                QueryResult::Concrete(v) => nontrivial.push(v),
            }
        }

        if k <= 0 {
            return QueryResult::Everything;
        }
        if k as usize > nontrivial.len() {
            return QueryResult::empty();
        }
        if k == 1 && nontrivial.len() == 1 {
            return QueryResult::Concrete(nontrivial.into_iter().next().unwrap());
        }
        if k as usize == nontrivial.len() {
            let mut iter = nontrivial.into_iter();
            let first = iter.next().unwrap();
            return iter.fold(QueryResult::Concrete(first), |acc, v| {
                QueryResult::intersect(acc, QueryResult::Concrete(v))
            });
        }
        if k == 1 {
            let mut iter = nontrivial.into_iter();
            let first = iter.next().unwrap();
            return iter.fold(QueryResult::Concrete(first), |acc, v| {
                QueryResult::union(acc, QueryResult::Concrete(v))
            });
        }

        QueryResult::Concrete(pick_common(k as usize, &nontrivial))
    }
}

fn merge_union(a: &[FileId], b: &[FileId]) -> Vec<FileId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

fn merge_intersect(a: &[FileId], b: &[FileId]) -> Vec<FileId> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Returns all file ids appearing in at least `cutoff` of `sources`.
/// Direct translation of `internal_pick_common` in the original
/// `QueryResult.cpp`: one cursor per source, repeatedly pick the minimum
/// current value, advance every cursor sitting on it, and keep the value
/// if enough cursors agreed.
fn pick_common(cutoff: usize, sources: &[Vec<FileId>]) -> Vec<FileId> {
    let mut heads: Vec<(&[FileId], usize)> =
        sources.iter().filter(|s| !s.is_empty()).map(|s| (s.as_slice(), 0)).collect();
    let mut result = Vec::new();

    while heads.len() >= cutoff {
        let min_id = heads.iter().map(|(s, pos)| s[*pos]).min().unwrap();

        let mut repeat_count = 0;
        let mut i = 0;
        while i < heads.len() {
            let (s, pos) = heads[i];
            if s[pos] == min_id {
                repeat_count += 1;
                let next_pos = pos + 1;
                if next_pos == s.len() {
                    heads.remove(i);
                    continue;
                } else {
                    heads[i].1 = next_pos;
                }
            }
            i += 1;
        }

        if repeat_count >= cutoff {
            result.push(min_id);
        }
    }

    result
}

/// Count and cumulative duration of one kind of query operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCounter {
    pub count: u64,
    pub duration: Duration,
}

impl QueryCounter {
    pub fn add(&mut self, other: &QueryCounter) {
        self.count += other.count;
        self.duration += other.duration;
    }

    fn record(&mut self, start: Instant) {
        self.count += 1;
        self.duration += start.elapsed();
    }
}

/// Four-way breakdown of algebra operations performed while evaluating a
/// query, mirroring the original `QueryCounters` (`ors_`, `ands_`,
/// `reads_`, `minofs_`).
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCounters {
    pub ors: QueryCounter,
    pub ands: QueryCounter,
    pub reads: QueryCounter,
    pub minofs: QueryCounter,
}

impl QueryCounters {
    pub fn add(&mut self, other: &QueryCounters) {
        self.ors.add(&other.ors);
        self.ands.add(&other.ands);
        self.reads.add(&other.reads);
        self.minofs.add(&other.minofs);
    }

    pub fn counters(&self) -> [(&'static str, QueryCounter); 4] {
        [("or", self.ors), ("and", self.ands), ("read", self.reads), ("minof", self.minofs)]
    }

    pub(crate) fn time_or<T>(opt: Option<&mut QueryCounters>, f: impl FnOnce() -> T) -> T {
        Self::time(opt, |c| &mut c.ors, f)
    }

    pub(crate) fn time_and<T>(opt: Option<&mut QueryCounters>, f: impl FnOnce() -> T) -> T {
        Self::time(opt, |c| &mut c.ands, f)
    }

    pub(crate) fn time_read<T>(opt: Option<&mut QueryCounters>, f: impl FnOnce() -> T) -> T {
        Self::time(opt, |c| &mut c.reads, f)
    }

    pub(crate) fn time_minof<T>(opt: Option<&mut QueryCounters>, f: impl FnOnce() -> T) -> T {
        Self::time(opt, |c| &mut c.minofs, f)
    }

    fn time<T>(
        opt: Option<&mut QueryCounters>,
        pick: impl FnOnce(&mut QueryCounters) -> &mut QueryCounter,
        f: impl FnOnce() -> T,
    ) -> T {
        let start = Instant::now();
        let out = f();
        if let Some(counters) = opt {
            pick(counters).record(start);
        }
        out
    }
}

#[cfg(test)]
#[path = "result_test.rs"]
mod result_test;
