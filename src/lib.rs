//! graindb: a content-search engine over arbitrary binary files, built
//! around inverted indexes keyed by short byte n-grams.
//!
//! Raw file contents are tokenized into 24-bit n-grams (`ngram`),
//! accumulated and radix-sorted into on-disk posting files (`index`),
//! grouped into immutable datasets (`dataset`) a database (`db`) holds
//! under a versioned snapshot (`snapshot`). Queries are a small boolean
//! DSL (`lang`) compiling to a tree (`query`) evaluated against a
//! snapshot's datasets. `dispatch` serves all of this over a
//! length-prefixed TCP wire protocol.

pub mod config;
pub mod dataset;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod ingest;
pub mod lang;
pub mod mmap;
pub mod ngram;
pub mod posting;
pub mod query;
pub mod snapshot;

pub use config::DbConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use ngram::IndexKind;
pub use query::Query;
pub use snapshot::{Snapshot, Task};
