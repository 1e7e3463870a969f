//! Collect file contents under a path for indexing (§4.I). A direct
//! recursive walk in the spirit of the teacher's `util::files::walk`
//! (formerly `src/_teacher_ref/util/files.rs`), specialized to this
//! crate's single use: read every regular file under a root into memory.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{err_at, Result};

pub fn collect_files(root: &Path) -> Result<Vec<(PathBuf, Vec<u8>)>> {
    let meta = err_at!(IoError, fs::metadata(root), "stat {:?}", root)?;
    if meta.is_file() {
        let bytes = err_at!(IoError, fs::read(root), "reading {:?}", root)?;
        return Ok(vec![(root.to_path_buf(), bytes)]);
    }

    let mut paths = Vec::new();
    walk(root, &mut paths)?;
    // Reading file contents is the only part of ingestion that's purely
    // data-parallel (per-file, no shared state); fan it out across cores
    // the way the teacher's `mq` pipeline stages use `rayon` for per-batch
    // work (§ AS.5).
    paths
        .into_par_iter()
        .map(|path| {
            let bytes = err_at!(IoError, fs::read(&path), "reading {:?}", path)?;
            Ok((path, bytes))
        })
        .collect()
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut subdirs = Vec::new();
    let entries = err_at!(IoError, fs::read_dir(dir), "read_dir({:?})", dir)?;
    for entry in entries {
        let entry = err_at!(IoError, entry)?;
        let file_type = err_at!(IoError, entry.file_type())?;
        if file_type.is_dir() {
            subdirs.push(entry.path());
        } else if file_type.is_file() {
            out.push(entry.path());
        }
    }
    for subdir in subdirs {
        walk(&subdir, out)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;
