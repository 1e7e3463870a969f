//! Compaction (§4.I): merge several datasets' postings into one, remapping
//! each source's `FileId`s into a single dense range. Because every source
//! index already stores its postings sorted per token, and each source is
//! given a disjoint, ordered slice of the merged id space, concatenating
//! the sources in order already yields a sorted run — no comparison merge
//! is needed, only the remap.

use std::path::Path;

use crate::index::builder::{FlatIndexBuilder, IndexBuilder};
use crate::index::INDEX_EXTENSION;
use crate::ngram::{IndexKind, NUM_TOKENS};
use crate::posting::FileId;
use crate::{err_at, Result};

use super::{Dataset, Manifest};

/// Merge every dataset in `sources` into one new dataset written under
/// `dir` with id `new_id`. All sources must share the same set of index
/// kinds.
pub fn compact(dir: &Path, new_id: &str, sources: &[&Dataset]) -> Result<Dataset> {
    if sources.is_empty() {
        return err_at!(SemanticError, msg: "compact requires at least one source dataset");
    }
    let kinds = sources[0].manifest().kinds()?;

    let mut files = Vec::new();
    let mut offsets = Vec::with_capacity(sources.len());
    for src in sources {
        offsets.push(files.len() as FileId);
        files.extend(src.manifest().files.iter().cloned());
    }

    let mut indexes = Vec::new();
    for kind in &kinds {
        let mut builder = FlatIndexBuilder::new(*kind);
        for (src, &offset) in sources.iter().zip(&offsets) {
            let reader = match src.reader(*kind) {
                Some(r) => r,
                None => {
                    return err_at!(
                        SemanticError,
                        msg: "dataset {} has no {} index",
                        src.id(),
                        kind
                    )
                }
            };
            for token in 0..(NUM_TOKENS as u32) {
                let ids = reader.postings(token)?;
                if ids.is_empty() {
                    continue;
                }
                let remapped: Vec<FileId> = ids.iter().map(|id| id + offset).collect();
                builder.add_postings(token, &remapped);
            }
        }
        let filename = format!("{}.{}.{}", new_id, kind.name(), INDEX_EXTENSION);
        builder.save(&dir.join(&filename))?;
        indexes.push((kind.name().to_string(), filename));
    }
    indexes.sort();

    let manifest = Manifest { id: new_id.to_string(), indexes, files };
    manifest.save(&dir.join(format!("{}.manifest.json", new_id)))?;

    Dataset::open(dir, manifest)
}

/// Group dataset indices by on-disk size for `smart` compaction: each group
/// contains datasets whose size is within `ratio` of the group's largest
/// (picked greedily from largest to smallest), and singleton groups are
/// dropped since there's nothing to merge (§4.I "smart", §9 Open Questions
/// — ratio fixed at 2 unless configured otherwise).
pub fn smart_groups(sizes: &[(usize, u64)], ratio: u64) -> Vec<Vec<usize>> {
    let mut sorted: Vec<(usize, u64)> = sizes.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<(usize, u64)> = Vec::new();
    let mut group_max: u64 = 0;

    for (idx, size) in sorted {
        if current.is_empty() {
            group_max = size;
            current.push((idx, size));
        } else if size.saturating_mul(ratio) >= group_max {
            current.push((idx, size));
        } else {
            if current.len() > 1 {
                groups.push(current.iter().map(|(i, _)| *i).collect());
            }
            group_max = size;
            current = vec![(idx, size)];
        }
    }
    if current.len() > 1 {
        groups.push(current.into_iter().map(|(i, _)| i).collect());
    }
    groups
}

#[cfg(test)]
#[path = "compact_test.rs"]
mod compact_test;
