//! On-disk index reader (§4.D): mmap a `.ursa` file, validate its header,
//! and answer single-token and literal queries.
//!
//! Grounded on `vernonrj-codesearch-rs`'s `IndexReader`/`PostReader` pair,
//! adapted from codesearch's sparse trigram table + binary search to this
//! format's dense, fixed-size `NUM_TOKENS + 1` offset table: token lookup
//! here is a direct array index, not a search.

use std::convert::TryInto;
use std::path::Path;

use crate::mmap::MemMap;
use crate::ngram::{IndexKind, Token, NUM_TOKENS};
use crate::posting::{codec::decode_run, FileId, QueryResult};
use crate::{err_at, Result};

use super::{DB_MAGIC, HEADER_SIZE, VERSION};

/// A read-only handle onto one on-disk index file.
pub struct IndexReader {
    map: MemMap,
    kind: IndexKind,
}

impl IndexReader {
    /// Open `path`, validating the magic and version in its header.
    pub fn open(path: impl AsRef<Path>) -> Result<IndexReader> {
        let map = MemMap::open(path)?;
        let data = map.data();
        if (data.len() as u64) < HEADER_SIZE + (NUM_TOKENS + 1) * 8 {
            return err_at!(InvalidFile, msg: "{:?} is too small to be an index file", map.name());
        }

        let magic = read_u32(data, 0)?;
        if magic != DB_MAGIC {
            return err_at!(InvalidFile, msg: "{:?}: bad magic {:#x}", map.name(), magic);
        }
        let version = read_u32(data, 4)?;
        if version != VERSION {
            return err_at!(
                InvalidFile,
                msg: "{:?}: unsupported version {} (want {})",
                map.name(),
                version,
                VERSION
            );
        }
        let kind = IndexKind::from_u32(read_u32(data, 8)?)?;

        Ok(IndexReader { map, kind })
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        self.map.name()
    }

    fn offsets_base(&self) -> u64 {
        (self.map.size() as u64) - (NUM_TOKENS + 1) * 8
    }

    fn offset(&self, token: Token) -> Result<u64> {
        let pos = self.offsets_base() + (token as u64) * 8;
        read_u64(self.map.data(), pos)
    }

    /// The postings for a single token, decoded into a sorted `FileId`
    /// vector (never `Everything` — a single token's postings are always a
    /// concrete, possibly-empty, set).
    pub fn postings(&self, token: Token) -> Result<Vec<FileId>> {
        let start = self.offset(token)?;
        let end = self.offset(token + 1)?;
        let data = self.map.data();
        let start = start as usize;
        let end = end as usize;
        if end < start || end > data.len() {
            return err_at!(InvalidFile, msg: "{:?}: corrupt offsets for token {}", self.path(), token);
        }
        decode_run(&data[start..end])
    }

    /// `QueryResult::Everything` if `tokens` is empty (i.e. the literal was
    /// shorter than this kind's minimum window and constrains nothing),
    /// otherwise the intersection of every token's postings.
    pub fn query_tokens(&self, tokens: &[Token]) -> Result<QueryResult> {
        if tokens.is_empty() {
            return Ok(QueryResult::everything());
        }
        let mut acc = QueryResult::everything();
        for &t in tokens {
            let ids = self.postings(t)?;
            acc = QueryResult::intersect(acc, QueryResult::from_sorted(ids));
            if acc.is_empty() {
                break;
            }
        }
        Ok(acc)
    }

    /// Lower `literal` to this reader's token kind and query its
    /// intersection.
    pub fn query_literal(&self, literal: &[u8]) -> Result<QueryResult> {
        let tokens = self.kind.tokens_for_literal(literal);
        self.query_tokens(&tokens)
    }
}

fn read_u32(data: &[u8], pos: u64) -> Result<u32> {
    let pos = pos as usize;
    let slice = match data.get(pos..pos + 4) {
        Some(s) => s,
        None => return err_at!(InvalidFile, msg: "truncated header at offset {}", pos),
    };
    Ok(u32::from_le_bytes(slice.try_into().unwrap()))
}

fn read_u64(data: &[u8], pos: u64) -> Result<u64> {
    let pos = pos as usize;
    let slice = match data.get(pos..pos + 8) {
        Some(s) => s,
        None => return err_at!(InvalidFile, msg: "truncated offset table at {}", pos),
    };
    Ok(u64::from_le_bytes(slice.try_into().unwrap()))
}

#[cfg(test)]
#[path = "reader_test.rs"]
mod reader_test;
