// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage
//!
//! One JSON entry per line, each carrying a sequence number and the
//! operation. Every append is synced before it returns. Replay keeps the
//! entries before the first unreadable one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write-ahead log of operations of type `T`
pub struct Wal<T> {
    file: File,
    sequence: u64,
    _op: PhantomData<fn(T)>,
}

impl<T> Wal<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open or create a WAL at the given path.
    ///
    /// A torn entry at the tail (a crash mid-append) is cut off so new
    /// appends start on a clean line.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let scan = Self::scan(path)?;
        if scan.torn {
            file.set_len(scan.valid_len)?;
            file.sync_all()?;
            tracing::warn!(
                path = %path.display(),
                position = scan.valid_len,
                "WAL truncated at torn entry"
            );
        }

        Ok(Self {
            file,
            sequence: scan.ops.len() as u64,
            _op: PhantomData,
        })
    }

    /// Append an operation to the log.
    ///
    /// On failure the file is cut back to its previous length so a
    /// partial line never survives.
    pub fn append(&mut self, op: &T) -> Result<u64, WalError> {
        let entry = EntryRef {
            seq: self.sequence + 1,
            op,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let len = self.file.metadata()?.len();
        if let Err(e) = self.write_synced(line.as_bytes()) {
            if let Err(undo) = self.file.set_len(len) {
                tracing::error!(error = %undo, position = len, "failed to roll back WAL append");
            }
            return Err(e.into());
        }
        self.sequence += 1;
        Ok(self.sequence)
    }

    fn write_synced(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;
        self.file.sync_all()
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Replay every complete operation from the log, stopping at the first
    /// unreadable entry
    pub fn replay(path: &Path) -> Result<Vec<T>, WalError> {
        Ok(Self::scan(path)?.ops)
    }

    fn scan(path: &Path) -> Result<Scan<T>, WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Scan::default()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut scan = Scan::default();
        let mut line = String::new();

        loop {
            line.clear();
            let read = match reader.read_line(&mut line) {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    tracing::warn!(path = %path.display(), error = %e, "stopping WAL replay due to read error");
                    scan.torn = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            if read == 0 {
                break;
            }
            // Every append ends in a newline; anything else is a torn write
            let Some(body) = line.strip_suffix('\n') else {
                tracing::warn!(path = %path.display(), "stopping WAL replay at torn entry");
                scan.torn = true;
                break;
            };
            if !body.is_empty() {
                match serde_json::from_str::<Entry<T>>(body) {
                    Ok(entry) => scan.ops.push(entry.op),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "stopping WAL replay due to read error");
                        scan.torn = true;
                        break;
                    }
                }
            }
            scan.valid_len += read as u64;
        }

        Ok(scan)
    }
}

/// Result of reading a log up to its last good entry
struct Scan<T> {
    ops: Vec<T>,
    /// Byte length of the readable prefix
    valid_len: u64,
    torn: bool,
}

impl<T> Default for Scan<T> {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            valid_len: 0,
            torn: false,
        }
    }
}

#[derive(Serialize)]
struct EntryRef<'a, T> {
    seq: u64,
    op: &'a T,
}

#[derive(Deserialize)]
struct Entry<T> {
    #[allow(dead_code)]
    seq: u64,
    op: T,
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
