//! Datasets: an immutable bundle of one index per requested [`IndexKind`]
//! plus the file-path manifest they're built over (§4.I).

pub mod compact;
pub mod manifest;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::index::builder::{FlatIndexBuilder, IndexBuilder};
use crate::index::reader::IndexReader;
use crate::index::INDEX_EXTENSION;
use crate::ngram::IndexKind;
use crate::posting::FileId;
use crate::{err_at, Result};

pub use manifest::Manifest;

/// An immutable, mmap-backed dataset: one reader per index kind it was
/// built with, plus the manifest translating `FileId` to path.
pub struct Dataset {
    dir: PathBuf,
    manifest: Manifest,
    readers: HashMap<IndexKind, IndexReader>,
}

impl Dataset {
    /// Tokenize `files` into fresh indexes for each of `kinds`, write them
    /// plus a manifest under `dir`, and open the result.
    ///
    /// `files` pairs each candidate path with its contents; a file whose
    /// contents are empty is skipped and never receives a `FileId`
    /// (§7 "Empty file": the indexer skips the file and continues).
    pub fn build(
        dir: &Path,
        id: &str,
        files: &[(PathBuf, Vec<u8>)],
        kinds: &[IndexKind],
    ) -> Result<Dataset> {
        let mut builders: HashMap<IndexKind, FlatIndexBuilder> =
            kinds.iter().map(|k| (*k, FlatIndexBuilder::new(*k))).collect();

        let mut paths = Vec::with_capacity(files.len());
        for (path, bytes) in files {
            if bytes.is_empty() {
                continue;
            }
            let fid = (paths.len() + 1) as FileId;
            for builder in builders.values_mut() {
                builder.add_file(fid, bytes);
            }
            paths.push(path.display().to_string());
        }

        let mut indexes = Vec::new();
        for (kind, mut builder) in builders {
            let filename = format!("{}.{}.{}", id, kind.name(), INDEX_EXTENSION);
            builder.save(&dir.join(&filename))?;
            indexes.push((kind.name().to_string(), filename));
        }
        indexes.sort();

        let manifest = Manifest { id: id.to_string(), indexes, files: paths };
        manifest.save(&dir.join(format!("{}.manifest.json", id)))?;

        Dataset::open(dir, manifest)
    }

    /// Open every index file a manifest names, mmapping each.
    pub fn open(dir: &Path, manifest: Manifest) -> Result<Dataset> {
        let mut readers = HashMap::new();
        for (name, filename) in &manifest.indexes {
            let kind = IndexKind::parse_name(name)?;
            readers.insert(kind, IndexReader::open(dir.join(filename))?);
        }
        Ok(Dataset { dir: dir.to_path_buf(), manifest, readers })
    }

    /// Load a dataset whose manifest already lives at
    /// `dir/<id>.manifest.json`.
    pub fn load(dir: &Path, id: &str) -> Result<Dataset> {
        let manifest = Manifest::load(&dir.join(format!("{}.manifest.json", id)))?;
        Dataset::open(dir, manifest)
    }

    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn reader(&self, kind: IndexKind) -> Option<&IndexReader> {
        self.readers.get(&kind)
    }

    pub fn num_files(&self) -> usize {
        self.manifest.files.len()
    }

    /// Sum of this dataset's on-disk index file sizes, used by smart
    /// compaction's size-ratio grouping (§4.I).
    pub fn disk_size(&self) -> Result<u64> {
        let mut total = 0u64;
        for (_, filename) in &self.manifest.indexes {
            let meta =
                err_at!(IoError, std::fs::metadata(self.dir.join(filename)), "stat {}", filename)?;
            total += meta.len();
        }
        Ok(total)
    }

    /// Delete this dataset's backing files. Callers must ensure no live
    /// snapshot still references this dataset (§8 invariant 8).
    pub fn remove_files(&self) -> Result<()> {
        for (_, filename) in &self.manifest.indexes {
            let _ = std::fs::remove_file(self.dir.join(filename));
        }
        let _ = std::fs::remove_file(self.dir.join(format!("{}.manifest.json", self.id())));
        Ok(())
    }
}
