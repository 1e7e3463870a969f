//! The database (§4.I indexing policy, §4.I compaction, §5 concurrency):
//! owns the mutex-guarded "current snapshot" pointer and the two mutating
//! operations, `index_path` and `compact`, that each complete by installing
//! a new snapshot atomically.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, instrument};

use crate::config::DbConfig;
use crate::dataset::{compact as compaction, Dataset};
use crate::ngram::IndexKind;
use crate::snapshot::{Snapshot, Task};
use crate::{err_at, Result};

pub struct Database {
    base_path: PathBuf,
    config: DbConfig,
    current: Mutex<Arc<Snapshot>>,
    next_task_id: AtomicU64,
}

impl Database {
    pub fn open(base_path: impl Into<PathBuf>, config: DbConfig) -> Result<Database> {
        let base_path = base_path.into();
        err_at!(IoError, std::fs::create_dir_all(&base_path), "creating {:?}", base_path)?;
        let max_memory_bytes = config.max_memory_bytes();
        let snapshot = Snapshot::empty(base_path.clone(), max_memory_bytes, 0x5eed_0001);
        Ok(Database {
            base_path,
            config,
            current: Mutex::new(Arc::new(snapshot)),
            next_task_id: AtomicU64::new(1),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Readers always operate on a snapshot captured at request entry
    /// (§4.I "Snapshot discipline"); this is the only way to obtain one.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.lock().unwrap())
    }

    pub fn new_task(&self, conn_id: String, request_str: String, work_estimated: u64) -> Arc<Task> {
        let id = self.next_task_id.fetch_add(1, Ordering::SeqCst);
        let task = Arc::new(Task::new(id, conn_id, request_str, work_estimated));
        self.snapshot().tasks.lock().unwrap().push(Arc::clone(&task));
        task
    }

    /// Split `files` across one or more datasets so no single builder
    /// exceeds its token buffer or the configured memory budget, build
    /// them, and publish a new snapshot with the result appended (§4.I
    /// "Indexing policy"). Oversize single files still get a dataset of
    /// their own rather than failing.
    #[instrument(skip(self, files, task))]
    pub fn index_path(
        &self,
        files: Vec<(PathBuf, Vec<u8>)>,
        kinds: &[IndexKind],
        task: Option<&Task>,
    ) -> Result<()> {
        let snapshot = self.snapshot();
        let (id, next_seed) = snapshot.allocate_dataset_id();
        let budget = self.config.max_memory_bytes();
        let token_budget = self.config.max_tokens_buffer();

        let mut batches: Vec<Vec<(PathBuf, Vec<u8>)>> = vec![Vec::new()];
        let mut batch_bytes = 0u64;
        let mut batch_tokens = 0u64;
        for (path, bytes) in files {
            let size = bytes.len() as u64;
            // Mirror FlatIndexBuilder::can_still_add's own prediction so a
            // batch never hands a per-kind builder more than it can hold,
            // not just more bytes than the memory budget allows.
            let predicted_tokens = if size < 3 { 0 } else { size - 2 };
            let overflows_bytes = batch_bytes > 0 && batch_bytes + size > budget;
            let overflows_tokens = batch_tokens > 0 && batch_tokens + predicted_tokens >= token_budget;
            if overflows_bytes || overflows_tokens {
                batches.push(Vec::new());
                batch_bytes = 0;
                batch_tokens = 0;
            }
            batch_bytes += size;
            batch_tokens += predicted_tokens;
            batches.last_mut().unwrap().push((path, bytes));
            if let Some(task) = task {
                task.advance(1);
            }
        }

        let mut new_datasets = Vec::new();
        for (i, batch) in batches.into_iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            let dataset_id = if i == 0 { id.clone() } else { format!("{}-{}", id, i) };
            info!(dataset = %dataset_id, files = batch.len(), "building dataset");
            let dataset = Dataset::build(&self.base_path, &dataset_id, &batch, kinds)?;
            new_datasets.push(Arc::new(dataset));
        }

        self.install(|snap| snap.with_datasets_added(new_datasets.clone(), next_seed));
        Ok(())
    }

    /// `compact (all)` merges every dataset into one; `smart` only merges
    /// groups whose sizes are within the configured ratio (§4.I
    /// "Compaction").
    #[instrument(skip(self))]
    pub fn compact(&self, smart: bool) -> Result<()> {
        let snapshot = self.snapshot();
        if snapshot.datasets.len() < 2 {
            return Ok(());
        }

        let groups: Vec<Vec<usize>> = if smart {
            let mut sizes = Vec::with_capacity(snapshot.datasets.len());
            for (i, d) in snapshot.datasets.iter().enumerate() {
                sizes.push((i, d.disk_size()?));
            }
            compaction::smart_groups(&sizes, self.config.smart_compaction_ratio())
        } else {
            vec![(0..snapshot.datasets.len()).collect()]
        };

        if groups.is_empty() {
            return Ok(());
        }

        let (id_base, mut seed) = snapshot.allocate_dataset_id();
        let mut merged = Vec::new();
        let mut removed: Vec<Arc<Dataset>> = Vec::new();
        let mut removed_ids = Vec::new();

        for (i, group) in groups.iter().enumerate() {
            let sources: Vec<&Dataset> =
                group.iter().map(|&idx| snapshot.datasets[idx].as_ref()).collect();
            let new_id = format!("{}-{}", id_base, i);
            info!(new_id = %new_id, sources = group.len(), "compacting datasets");
            let merged_ds = compaction::compact(&self.base_path, &new_id, &sources)?;
            merged.push(Arc::new(merged_ds));
            for &idx in group {
                removed.push(Arc::clone(&snapshot.datasets[idx]));
                removed_ids.push(snapshot.datasets[idx].id().to_string());
            }
            seed = seed.wrapping_add(1);
        }

        drop(snapshot);
        self.install(|snap| snap.replace_datasets(&removed_ids, merged.clone(), seed));

        // Defer unlinking to datasets no live snapshot references any
        // longer (§8 invariant 8, §4.I "Snapshot discipline").
        for ds in removed {
            if Arc::strong_count(&ds) == 1 {
                ds.remove_files()?;
            }
        }
        Ok(())
    }

    /// Rebuild a dataset from its own manifest's file list with an
    /// expanded set of kinds (§4.H `reindex "id" with [...]`): union the
    /// dataset's existing kinds with the requested ones, re-tokenize every
    /// source file, and publish the rebuild in the old dataset's place.
    #[instrument(skip(self, task))]
    pub fn reindex(&self, dataset_id: &str, kinds: &[IndexKind], task: Option<&Task>) -> Result<()> {
        let snapshot = self.snapshot();
        let old = match snapshot.find(dataset_id) {
            Some(ds) => Arc::clone(ds),
            None => return err_at!(SemanticError, msg: "no such dataset: {}", dataset_id),
        };

        let mut target_kinds = old.manifest().kinds()?;
        for kind in kinds {
            if !target_kinds.contains(kind) {
                target_kinds.push(*kind);
            }
        }

        let mut files = Vec::with_capacity(old.num_files());
        for path in &old.manifest().files {
            let bytes = err_at!(IoError, std::fs::read(path), "reading {}", path)?;
            files.push((PathBuf::from(path), bytes));
            if let Some(task) = task {
                task.advance(1);
            }
        }

        let (new_id, next_seed) = snapshot.allocate_dataset_id();
        info!(dataset = %dataset_id, into = %new_id, "reindexing dataset");
        let rebuilt = Arc::new(Dataset::build(&self.base_path, &new_id, &files, &target_kinds)?);

        drop(snapshot);
        self.install(|snap| {
            snap.replace_datasets(&[dataset_id.to_string()], vec![Arc::clone(&rebuilt)], next_seed)
        });

        if Arc::strong_count(&old) == 1 {
            old.remove_files()?;
        }
        Ok(())
    }

    fn install(&self, f: impl FnOnce(&Snapshot) -> Snapshot) {
        let mut guard = self.current.lock().unwrap();
        let next = f(&guard);
        *guard = Arc::new(next);
    }
}

#[cfg(test)]
#[path = "db_test.rs"]
mod db_test;
