//! Posting-run codec and the `QueryResult` set algebra over posting lists.

pub mod codec;
pub mod result;

pub use codec::{decode_run, encode_run};
pub use result::{QueryCounter, QueryCounters, QueryResult};

/// A monotonic 40-bit identifier of a file within a dataset. Zero is
/// reserved as "unused" (§3).
pub type FileId = u64;

/// Mask selecting the 40 low bits a `FileId` is allowed to occupy.
pub const FILE_ID_MASK: u64 = (1 << 40) - 1;
