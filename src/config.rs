//! Runtime configuration (§AS.3): a plain builder struct, following the
//! teacher's `robt::Config` shape (`Config::new` plus `set_*` methods) —
//! no config-file crate.

use crate::index::builder::MAX_TOKENS_BUFFER;

pub const DEFAULT_WORKERS: usize = 3;
pub const DEFAULT_BIND: &str = "127.0.0.1:9281";
pub const DEFAULT_SMART_COMPACTION_RATIO: u64 = 2;
pub const DEFAULT_MAX_MEMORY_BYTES: u64 = 1 << 30;

#[derive(Clone, Debug)]
pub struct DbConfig {
    workers: usize,
    bind: String,
    smart_compaction_ratio: u64,
    max_memory_bytes: u64,
    max_tokens_buffer: u64,
}

impl Default for DbConfig {
    fn default() -> DbConfig {
        DbConfig {
            workers: DEFAULT_WORKERS,
            bind: DEFAULT_BIND.to_string(),
            smart_compaction_ratio: DEFAULT_SMART_COMPACTION_RATIO,
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
            max_tokens_buffer: MAX_TOKENS_BUFFER,
        }
    }
}

impl DbConfig {
    pub fn new() -> DbConfig {
        DbConfig::default()
    }

    pub fn set_workers(mut self, n: usize) -> DbConfig {
        self.workers = n;
        self
    }

    pub fn set_bind(mut self, addr: impl Into<String>) -> DbConfig {
        self.bind = addr.into();
        self
    }

    pub fn set_smart_compaction_ratio(mut self, ratio: u64) -> DbConfig {
        self.smart_compaction_ratio = ratio;
        self
    }

    pub fn set_max_memory_bytes(mut self, bytes: u64) -> DbConfig {
        self.max_memory_bytes = bytes;
        self
    }

    pub fn set_max_tokens_buffer(mut self, tokens: u64) -> DbConfig {
        self.max_tokens_buffer = tokens;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn bind(&self) -> &str {
        &self.bind
    }

    pub fn smart_compaction_ratio(&self) -> u64 {
        self.smart_compaction_ratio
    }

    pub fn max_memory_bytes(&self) -> u64 {
        self.max_memory_bytes
    }

    pub fn max_tokens_buffer(&self) -> u64 {
        self.max_tokens_buffer
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
