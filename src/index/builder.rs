//! In-memory index builder (§4.E): accumulate `(file_id, token)` pairs,
//! radix-sort them, and emit an on-disk index file.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::radix::flat_radixsort;
use super::{DB_MAGIC, HEADER_SIZE, VERSION};
use crate::ngram::{IndexKind, NUM_TOKENS};
use crate::posting::{codec::encode_run, FileId, FILE_ID_MASK};
use crate::{err_at, Result};

/// Maximum number of `(token, fid)` records the flat builder will buffer,
/// `64 * 1024 * 1024` (≈512 MiB of 8-byte records).
pub const MAX_TOKENS_BUFFER: u64 = 64 * 1024 * 1024;

/// Abstract builder interface (§4.E). A builder accumulates files for
/// exactly one [`IndexKind`] and is owned by a single indexing task.
pub trait IndexBuilder {
    /// Tokenize `bytes` (the contents of file `fid`) and absorb them.
    fn add_file(&mut self, fid: FileId, bytes: &[u8]);

    /// Conservatively predict whether absorbing a further file of `size`
    /// bytes would overflow this builder's buffer.
    fn can_still_add(&self, size: u64) -> bool;

    /// Sort, deduplicate, and write the accumulated index to `path`.
    /// Refuses to overwrite an existing file (§ SUPPLEMENTED FEATURES:
    /// exclusive-create semantics from the original `RawFile`).
    fn save(&mut self, path: &Path) -> Result<()>;

    fn kind(&self) -> IndexKind;

    fn is_empty(&self) -> bool;
}

/// The one concrete builder this crate ships: a flat `Vec<u64>` of
/// `(token << 40) | fid` records, radix-sorted on save.
pub struct FlatIndexBuilder {
    kind: IndexKind,
    raw: Vec<u64>,
    max_fileid: FileId,
}

impl FlatIndexBuilder {
    pub fn new(kind: IndexKind) -> FlatIndexBuilder {
        FlatIndexBuilder { kind, raw: Vec::new(), max_fileid: 0 }
    }

    fn record(token: u32, fid: FileId) -> u64 {
        ((token as u64) << 40) | (fid & FILE_ID_MASK)
    }

    /// Directly absorb postings already computed for `token`, bypassing
    /// tokenization. Compaction uses this to remap and concatenate postings
    /// from several source indexes without re-reading file contents.
    pub fn add_postings(&mut self, token: crate::ngram::Token, fids: &[FileId]) {
        for &fid in fids {
            self.max_fileid = self.max_fileid.max(fid);
            self.raw.push(FlatIndexBuilder::record(token, fid));
        }
    }
}

impl IndexBuilder for FlatIndexBuilder {
    fn add_file(&mut self, fid: FileId, bytes: &[u8]) {
        self.max_fileid = self.max_fileid.max(fid);
        let kind = self.kind;
        let raw = &mut self.raw;
        kind.generate(bytes, |token| raw.push(FlatIndexBuilder::record(token, fid)));
    }

    fn can_still_add(&self, size: u64) -> bool {
        let predicted = if size < 3 { 0 } else { size - 2 };
        (self.raw.len() as u64) + predicted < MAX_TOKENS_BUFFER
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let fd = err_at!(
            IoError,
            OpenOptions::new().write(true).create_new(true).open(path),
            "creating index file {:?}",
            path
        )?;
        let mut w = BufWriter::new(fd);

        err_at!(IoError, w.write_u32::<LittleEndian>(DB_MAGIC))?;
        err_at!(IoError, w.write_u32::<LittleEndian>(VERSION))?;
        err_at!(IoError, w.write_u32::<LittleEndian>(self.kind.as_u32()))?;
        err_at!(IoError, w.write_u32::<LittleEndian>(0))?; // reserved

        flat_radixsort(&mut self.raw, self.max_fileid);
        self.raw.dedup();

        let num_tokens = NUM_TOKENS as u32;
        let mut offsets = vec![0u64; (num_tokens as usize) + 1];
        offsets[0] = HEADER_SIZE;

        let mut offset = HEADER_SIZE;
        let mut last_token: i64 = -1;
        let mut run: Vec<FileId> = Vec::new();

        let mut flush_run = |w: &mut BufWriter<std::fs::File>,
                              offset: &mut u64,
                              offsets: &mut [u64],
                              last_token: i64,
                              next_token: i64,
                              run: &mut Vec<FileId>|
         -> Result<()> {
            let bytes = encode_run(run);
            err_at!(IoError, w.write_all(&bytes))?;
            *offset += bytes.len() as u64;
            let mut v = last_token + 1;
            while v <= next_token {
                offsets[v as usize] = *offset;
                v += 1;
            }
            run.clear();
            Ok(())
        };

        for &rec in self.raw.iter() {
            let token = ((rec >> 40) & 0x00FF_FFFF) as i64;
            let fid = rec & FILE_ID_MASK;
            if last_token == -1 {
                // First record ever: every token strictly before `token`
                // has an empty interval starting at the payload's base
                // offset, symmetric to the tail-fill below. Without this,
                // offsets[1..=token] stay zero-initialized instead of
                // HEADER_SIZE, and the lowest token with postings ends up
                // absorbing the file header into its own run.
                let mut v = 1i64;
                while v <= token {
                    offsets[v as usize] = offset;
                    v += 1;
                }
            } else if token != last_token {
                flush_run(&mut w, &mut offset, &mut offsets, last_token, token, &mut run)?;
            }
            run.push(fid);
            last_token = token;
        }
        if last_token != -1 {
            flush_run(&mut w, &mut offset, &mut offsets, last_token, last_token, &mut run)?;
        }
        // Fill remaining offsets (from last_token+1 through NUM_TOKENS) with
        // the final running offset: those tokens have empty intervals.
        let mut v = (last_token + 1).max(0) as usize;
        while v <= num_tokens as usize {
            offsets[v] = offset;
            v += 1;
        }

        for &o in offsets.iter() {
            err_at!(IoError, w.write_u64::<LittleEndian>(o))?;
        }
        err_at!(IoError, w.flush())?;
        Ok(())
    }

    fn kind(&self) -> IndexKind {
        self.kind
    }

    fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
