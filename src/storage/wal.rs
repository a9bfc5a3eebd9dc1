// Copyright 2025 Coleman Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Write-Ahead Log
//!
//! Append-only log of logical mutations with per-record CRC32 integrity
//! checks. A successful append is on durable storage before the caller may
//! mutate in-memory state.
//!
//! File layout (little-endian):
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ Magic     (12 bytes)  "COLEMAN_WAL\0"                 │
//! │ Version   (4 bytes)   Format version (currently 1)    │
//! ├───────────────────────────────────────────────────────┤
//! │ Record                                                │
//! │   Sequence  (8 bytes)  strictly increasing from 1     │
//! │   Data Len  (4 bytes)  size of data payload           │
//! │   Data      (variable) encoded WalEntry               │
//! │   CRC32     (4 bytes)  checksum of data only          │
//! ├───────────────────────────────────────────────────────┤
//! │ ... more records ...                                  │
//! └───────────────────────────────────────────────────────┘
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::core::{Error, Result, Row, Schema, Value};
use crate::storage::codec::{put_schema, put_str, put_value, Reader};

/// Magic bytes at the start of every WAL file
pub const WAL_MAGIC: [u8; 12] = *b"COLEMAN_WAL\0";

/// Current WAL format version
pub const WAL_VERSION: u32 = 1;

/// Header size: magic + version
pub const WAL_HEADER_SIZE: u64 = 16;

/// Per-record overhead: sequence + data length + CRC32
const RECORD_OVERHEAD: usize = 8 + 4 + 4;

/// Entry tag for CreateTable records
pub const ENTRY_CREATE_TABLE: u8 = 0x01;

/// Entry tag for AddRecord records
pub const ENTRY_ADD_RECORD: u8 = 0x02;

/// A logical mutation recorded in the WAL
///
/// Entries carry no timestamps; ordering is the log's sequence number.
#[derive(Debug, Clone, PartialEq)]
pub enum WalEntry {
    /// A table was created
    CreateTable {
        /// Name of the new table
        table_name: String,
        /// Its schema
        schema: Schema,
    },

    /// A record was appended to a table
    AddRecord {
        /// Target table name
        table_name: String,
        /// The record's values, in schema order
        values: Row,
    },
}

impl WalEntry {
    /// Encode the entry data payload (tag + body)
    ///
    /// ```text
    /// 0x01 CreateTable: tag | name | schema
    /// 0x02 AddRecord:   tag | name | u32 value_count | values
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            WalEntry::CreateTable { table_name, schema } => {
                buf.push(ENTRY_CREATE_TABLE);
                put_str(&mut buf, table_name);
                put_schema(&mut buf, schema);
            }
            WalEntry::AddRecord { table_name, values } => {
                buf.push(ENTRY_ADD_RECORD);
                put_str(&mut buf, table_name);
                buf.extend_from_slice(&(values.len() as u32).to_le_bytes());
                for value in values {
                    put_value(&mut buf, value);
                }
            }
        }
        buf
    }

    /// Decode an entry from its data payload
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let tag = reader.read_u8("entry tag")?;
        match tag {
            ENTRY_CREATE_TABLE => {
                let table_name = reader.read_str("table name")?;
                let schema = reader.read_schema()?;
                Ok(WalEntry::CreateTable { table_name, schema })
            }
            ENTRY_ADD_RECORD => {
                let table_name = reader.read_str("table name")?;
                let value_count = reader.read_u32("value count")? as usize;
                let mut values: Vec<Value> = Vec::with_capacity(value_count);
                for _ in 0..value_count {
                    values.push(reader.read_value()?);
                }
                Ok(WalEntry::AddRecord { table_name, values })
            }
            other => Err(Error::InvalidEntryType(other)),
        }
    }

    /// Table the entry targets
    pub fn table_name(&self) -> &str {
        match self {
            WalEntry::CreateTable { table_name, .. } => table_name,
            WalEntry::AddRecord { table_name, .. } => table_name,
        }
    }
}

/// Append-only write-ahead log over a single file
///
/// `append` and `truncate` serialize on an internal mutex, so records are
/// totally ordered even if callers race.
#[derive(Debug)]
pub struct Wal {
    path: PathBuf,
    file: Mutex<File>,
    seq: AtomicU64,
}

impl Wal {
    /// Open the WAL at the given path, creating it if missing
    ///
    /// A new file gets a fresh header. An existing file has its header
    /// verified, then its records scanned to recover the highest committed
    /// sequence number. A partially written trailing record is the log
    /// tail from a crash mid-append; it is cut off so later appends start
    /// at a record boundary.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;

        let len = file.metadata()?.len();
        let seq = if len == 0 {
            file.write_all(&WAL_MAGIC)?;
            file.write_all(&WAL_VERSION.to_le_bytes())?;
            file.sync_all()?;
            0
        } else {
            Self::verify_header(&mut file)?;
            let (last_seq, valid_end) = Self::scan(&mut file, len)?;
            if valid_end < len {
                log::warn!(
                    "WAL {} has a partial record at offset {}; truncating {} trailing bytes",
                    path.display(),
                    valid_end,
                    len - valid_end
                );
                file.set_len(valid_end)?;
                file.sync_all()?;
            }
            last_seq
        };

        Ok(Self {
            path,
            file: Mutex::new(file),
            seq: AtomicU64::new(seq),
        })
    }

    fn verify_header(file: &mut File) -> Result<()> {
        file.seek(SeekFrom::Start(0))?;
        let mut magic = [0u8; 12];
        file.read_exact(&mut magic)
            .map_err(|_| Error::InvalidWalMagic)?;
        if magic != WAL_MAGIC {
            return Err(Error::InvalidWalMagic);
        }
        let mut version = [0u8; 4];
        file.read_exact(&mut version)
            .map_err(|_| Error::InvalidWalMagic)?;
        let version = u32::from_le_bytes(version);
        if version != WAL_VERSION {
            return Err(Error::InvalidWalVersion { version });
        }
        Ok(())
    }

    /// Walk record frames to find the last complete record
    ///
    /// Returns the highest sequence number seen and the offset one past the
    /// last complete record. CRCs are not checked here; replay validates
    /// them.
    fn scan(file: &mut File, len: u64) -> Result<(u64, u64)> {
        let mut pos = WAL_HEADER_SIZE;
        let mut last_seq = 0u64;
        file.seek(SeekFrom::Start(pos))?;
        let mut reader = BufReader::new(file);

        loop {
            let mut frame_head = [0u8; 12];
            match read_fully(&mut reader, &mut frame_head)? {
                ReadOutcome::Complete => {}
                ReadOutcome::Eof | ReadOutcome::Partial => break,
            }
            let seq = u64::from_le_bytes(frame_head[0..8].try_into().unwrap());
            let data_len = u32::from_le_bytes(frame_head[8..12].try_into().unwrap()) as u64;
            let record_end = pos + RECORD_OVERHEAD as u64 + data_len;
            if record_end > len {
                break;
            }
            reader.seek(SeekFrom::Current(data_len as i64 + 4))?;
            last_seq = seq;
            pos = record_end;
        }

        Ok((last_seq, pos))
    }

    /// Append an entry and flush it to durable storage
    ///
    /// Returns the record's sequence number. The record is on disk when
    /// this returns; the caller may then mutate in-memory state.
    pub fn append(&self, entry: &WalEntry) -> Result<u64> {
        let data = entry.encode();
        let crc = crc32fast::hash(&data);

        let mut file = self.file.lock();
        let seq = self.seq.load(Ordering::Acquire) + 1;

        let mut frame = Vec::with_capacity(RECORD_OVERHEAD + data.len());
        frame.extend_from_slice(&seq.to_le_bytes());
        frame.extend_from_slice(&(data.len() as u32).to_le_bytes());
        frame.extend_from_slice(&data);
        frame.extend_from_slice(&crc.to_le_bytes());

        file.seek(SeekFrom::End(0))?;
        file.write_all(&frame)?;
        file.sync_data()?;

        self.seq.store(seq, Ordering::Release);
        Ok(seq)
    }

    /// Replay every record, delivering fully decoded entries to `visit`
    ///
    /// A CRC mismatch fails with [`Error::WalCorruption`]; an unknown tag
    /// fails with [`Error::InvalidEntryType`] / [`Error::InvalidValueType`].
    /// A premature end of file is the log tail and stops the walk cleanly.
    pub fn replay(&self, mut visit: impl FnMut(u64, WalEntry) -> Result<()>) -> Result<()> {
        let file = self.file.lock();
        let mut handle = file.try_clone()?;
        handle.seek(SeekFrom::Start(WAL_HEADER_SIZE))?;
        let mut reader = BufReader::new(handle);

        loop {
            let mut frame_head = [0u8; 12];
            match read_fully(&mut reader, &mut frame_head)? {
                ReadOutcome::Complete => {}
                ReadOutcome::Eof | ReadOutcome::Partial => break,
            }
            let seq = u64::from_le_bytes(frame_head[0..8].try_into().unwrap());
            let data_len = u32::from_le_bytes(frame_head[8..12].try_into().unwrap()) as usize;

            let mut data = vec![0u8; data_len];
            match read_fully(&mut reader, &mut data)? {
                ReadOutcome::Complete => {}
                ReadOutcome::Eof | ReadOutcome::Partial => break,
            }
            let mut crc_bytes = [0u8; 4];
            match read_fully(&mut reader, &mut crc_bytes)? {
                ReadOutcome::Complete => {}
                ReadOutcome::Eof | ReadOutcome::Partial => break,
            }

            let stored_crc = u32::from_le_bytes(crc_bytes);
            if crc32fast::hash(&data) != stored_crc {
                return Err(Error::WalCorruption { seq });
            }

            let entry = WalEntry::decode(&data)?;
            visit(seq, entry)?;
        }

        Ok(())
    }

    /// Reset the log to just its header and the sequence counter to 0
    pub fn truncate(&self) -> Result<()> {
        let mut file = self.file.lock();
        file.set_len(WAL_HEADER_SIZE)?;
        file.seek(SeekFrom::End(0))?;
        file.sync_all()?;
        self.seq.store(0, Ordering::Release);
        log::debug!("WAL {} truncated to header", self.path.display());
        Ok(())
    }

    /// Current file size in bytes
    pub fn size(&self) -> Result<u64> {
        let file = self.file.lock();
        Ok(file.metadata()?.len())
    }

    /// Highest committed sequence number (0 on a fresh or truncated log)
    pub fn current_seq(&self) -> u64 {
        self.seq.load(Ordering::Acquire)
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

enum ReadOutcome {
    Complete,
    Partial,
    Eof,
}

/// Fill `buf` from the reader, distinguishing a clean EOF from a torn tail
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Ok(if filled == 0 {
                    ReadOutcome::Eof
                } else {
                    ReadOutcome::Partial
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(ReadOutcome::Complete)
}
