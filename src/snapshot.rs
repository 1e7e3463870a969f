//! Snapshot (§3, §4.I "Snapshot discipline", §4.J task tracker): the
//! immutable view of the database every request operates on. The database
//! holds one "current" snapshot under a mutex; installing a new one swaps
//! the pointer, never mutates datasets already published.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::dataset::Dataset;

/// One in-flight command execution (§4.J). `work_done` advances
/// monotonically toward `work_estimated`; `status` dumps these.
pub struct Task {
    pub id: u64,
    pub conn_id: String,
    pub request_str: String,
    work_done: AtomicU64,
    pub work_estimated: u64,
}

impl Task {
    pub fn new(id: u64, conn_id: String, request_str: String, work_estimated: u64) -> Task {
        Task { id, conn_id, request_str, work_done: AtomicU64::new(0), work_estimated }
    }

    pub fn advance(&self, n: u64) {
        self.work_done.fetch_add(n, Ordering::SeqCst);
    }

    pub fn work_done(&self) -> u64 {
        self.work_done.load(Ordering::SeqCst)
    }
}

/// The `(datasets*, tasks*, max_memory_bytes, db_base_path, rng_seed_state)`
/// tuple from §3, as an immutable, cheaply-cloneable snapshot.
pub struct Snapshot {
    pub datasets: Vec<Arc<Dataset>>,
    pub tasks: Arc<Mutex<Vec<Arc<Task>>>>,
    pub max_memory_bytes: u64,
    pub db_base_path: PathBuf,
    pub rng_seed_state: u64,
}

impl Snapshot {
    pub fn empty(db_base_path: PathBuf, max_memory_bytes: u64, rng_seed_state: u64) -> Snapshot {
        Snapshot {
            datasets: Vec::new(),
            tasks: Arc::new(Mutex::new(Vec::new())),
            max_memory_bytes,
            db_base_path,
            rng_seed_state,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Dataset>> {
        self.datasets.iter().find(|d| d.id() == id)
    }

    /// Derive a fresh dataset id from `rng_seed_state`, and the seed state
    /// the *next* allocation should start from — the original's
    /// `DatabaseSnapshot::allocate_name` draws from a PRNG carried in the
    /// snapshot tuple rather than a global, so each allocation both reads
    /// and advances that one seed (§ SUPPLEMENTED FEATURES).
    pub fn allocate_dataset_id(&self) -> (String, u64) {
        let mut rng = SmallRng::seed_from_u64(self.rng_seed_state);
        let name_bits = rng.next_u64();
        let next_state = rng.next_u64();
        (format!("ds-{:016x}", name_bits), next_state)
    }

    /// A new snapshot with `added` appended and the rng state advanced.
    pub fn with_datasets_added(&self, added: Vec<Arc<Dataset>>, next_seed: u64) -> Snapshot {
        let mut datasets = self.datasets.clone();
        datasets.extend(added);
        Snapshot {
            datasets,
            tasks: Arc::clone(&self.tasks),
            max_memory_bytes: self.max_memory_bytes,
            db_base_path: self.db_base_path.clone(),
            rng_seed_state: next_seed,
        }
    }

    /// A new snapshot with every dataset whose id is in `removed_ids`
    /// dropped and `added` appended in their place (used by compaction:
    /// remove the merged-away sources, add the merged result).
    pub fn replace_datasets(
        &self,
        removed_ids: &[String],
        added: Vec<Arc<Dataset>>,
        next_seed: u64,
    ) -> Snapshot {
        let mut datasets: Vec<Arc<Dataset>> =
            self.datasets.iter().filter(|d| !removed_ids.iter().any(|id| id == d.id())).cloned().collect();
        datasets.extend(added);
        Snapshot {
            datasets,
            tasks: Arc::clone(&self.tasks),
            max_memory_bytes: self.max_memory_bytes,
            db_base_path: self.db_base_path.clone(),
            rng_seed_state: next_seed,
        }
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;
