//! Query tree and evaluator (§4.G): `select` bodies parse into a [`Query`],
//! which [`evaluate`] runs against a dataset's indexes.

use crate::dataset::Dataset;
use crate::ngram::IndexKind;
use crate::posting::{FileId, QueryCounters, QueryResult};

/// A parsed `select` query. Built by [`crate::lang`], evaluated here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    Literal(Vec<u8>),
    And(Vec<Query>),
    Or(Vec<Query>),
    MinOf(i64, Vec<Query>),
}

impl Query {
    /// Evaluate this query against one dataset, restricted to `kinds`
    /// (every enabled kind's index must admit a file for it to match —
    /// §4.G: "all must admit a file").
    pub fn evaluate(
        &self,
        dataset: &Dataset,
        kinds: &[IndexKind],
        counters: Option<&mut QueryCounters>,
    ) -> crate::Result<QueryResult> {
        eval(self, dataset, kinds, counters)
    }
}

fn eval(
    q: &Query,
    dataset: &Dataset,
    kinds: &[IndexKind],
    mut counters: Option<&mut QueryCounters>,
) -> crate::Result<QueryResult> {
    match q {
        Query::Literal(bytes) => {
            let mut acc = QueryResult::everything();
            for kind in kinds {
                let reader = match dataset.reader(*kind) {
                    Some(r) => r,
                    None => continue,
                };
                let hits = QueryCounters::time_read(counters.as_deref_mut(), || {
                    reader.query_literal(bytes)
                })?;
                acc = QueryResult::intersect(acc, hits);
                if acc.is_empty() {
                    break;
                }
            }
            Ok(acc)
        }
        Query::And(children) => {
            let mut acc = QueryResult::everything();
            for child in children {
                let hits = eval(child, dataset, kinds, counters.as_deref_mut())?;
                acc = QueryCounters::time_and(counters.as_deref_mut(), || {
                    QueryResult::intersect(acc.clone(), hits)
                });
                if acc.is_empty() {
                    break;
                }
            }
            Ok(acc)
        }
        Query::Or(children) => {
            let mut acc = QueryResult::empty();
            for child in children {
                let hits = eval(child, dataset, kinds, counters.as_deref_mut())?;
                acc = QueryCounters::time_or(counters.as_deref_mut(), || {
                    QueryResult::union(acc.clone(), hits)
                });
                if acc.is_everything() {
                    break;
                }
            }
            Ok(acc)
        }
        Query::MinOf(k, children) => {
            let mut sources = Vec::with_capacity(children.len());
            for child in children {
                sources.push(eval(child, dataset, kinds, counters.as_deref_mut())?);
            }
            Ok(QueryCounters::time_minof(counters, || QueryResult::min_of(*k, sources)))
        }
    }
}

/// Evaluate `query` across every dataset in `datasets`, translating each
/// hit's `FileId` to its stored path via that dataset's manifest (§4.G,
/// "the dataset-level evaluator").
pub fn evaluate_all<'a>(
    query: &Query,
    datasets: impl IntoIterator<Item = &'a Dataset>,
    kinds: &[IndexKind],
    mut counters: Option<&mut QueryCounters>,
) -> crate::Result<Vec<String>> {
    let mut paths = Vec::new();
    for dataset in datasets {
        let hits = query.evaluate(dataset, kinds, counters.as_deref_mut())?;
        if hits.is_everything() {
            paths.extend(dataset.manifest().files.iter().cloned());
            continue;
        }
        for fid in hits.ids() {
            if let Some(path) = dataset.manifest().path_for(*fid as FileId) {
                paths.push(path.to_string());
            }
        }
    }
    Ok(paths)
}
