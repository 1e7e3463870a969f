//! A scoped, read-only memory-mapped file (§4.C).
//!
//! Mirrors the original `MemMap` class: non-copyable, movable, and
//! distinguishing the "empty file" case (which the indexer treats as
//! "skip this file, don't fail the whole batch") from every other I/O
//! failure.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::{err_at, Error, Result};

/// A read-only mapping of a file's full contents.
pub struct MemMap {
    map: Mmap,
    name: PathBuf,
}

impl MemMap {
    /// Open and map `path`. Refuses zero-length files with
    /// [`Error::EmptyFile`] rather than mapping an empty region (mapping
    /// a zero-length file is platform-dependent and never useful here).
    pub fn open(path: impl AsRef<Path>) -> Result<MemMap> {
        let path = path.as_ref();
        let file = err_at!(IoError, File::open(path), "opening {:?}", path)?;
        let len = err_at!(IoError, file.metadata())?.len();
        if len == 0 {
            return err_at!(EmptyFile, msg: "{:?}", path);
        }
        let map = err_at!(IoError, unsafe { Mmap::map(&file) }, "mmap {:?}", path)?;
        Ok(MemMap { map, name: path.to_path_buf() })
    }

    pub fn data(&self) -> &[u8] {
        &self.map
    }

    pub fn size(&self) -> usize {
        self.map.len()
    }

    pub fn name(&self) -> &Path {
        &self.name
    }
}

#[cfg(test)]
#[path = "mmap_test.rs"]
mod mmap_test;
