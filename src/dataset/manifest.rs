//! Durable dataset manifest (§4.I, §6 "Dataset manifest"): dataset id, its
//! component index files, and the ordered file-path list `FileId` indexes
//! into. Written as pretty JSON via `serde_json` (§ Open Questions: the
//! source doesn't pin an exact manifest byte layout, so any self-describing
//! format that's durable and atomically replaced qualifies).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ngram::IndexKind;
use crate::posting::FileId;
use crate::{err_at, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub id: String,
    /// `(kind name, index filename)`, one per built index.
    pub indexes: Vec<(String, String)>,
    /// 1-based: `files[fid - 1]` is the path stored under `fid`.
    pub files: Vec<String>,
}

impl Manifest {
    /// Write `self` as the manifest at `path`, replacing any prior contents
    /// atomically via write-temp-then-rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = err_at!(FailConvert, serde_json::to_vec_pretty(self))?;
        let tmp = path.with_extension("manifest.tmp");
        err_at!(IoError, std::fs::write(&tmp, &json), "writing {:?}", tmp)?;
        err_at!(IoError, std::fs::rename(&tmp, path), "renaming {:?} -> {:?}", tmp, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Manifest> {
        let data = err_at!(IoError, std::fs::read(path), "reading {:?}", path)?;
        err_at!(ParseError, serde_json::from_slice(&data), "parsing manifest {:?}", path)
    }

    /// The stored path for `fid`, or `None` if out of range.
    pub fn path_for(&self, fid: FileId) -> Option<&str> {
        let idx = fid.checked_sub(1)?;
        self.files.get(idx as usize).map(|s| s.as_str())
    }

    pub fn kinds(&self) -> Result<Vec<IndexKind>> {
        self.indexes.iter().map(|(name, _)| IndexKind::parse_name(name)).collect()
    }

    pub fn index_filename(&self, kind: IndexKind) -> Option<&str> {
        self.indexes.iter().find(|(name, _)| name == kind.name()).map(|(_, f)| f.as_str())
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod manifest_test;
