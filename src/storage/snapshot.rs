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

//! Snapshot store
//!
//! Writes a full dump of all tables to a single file and commits it with
//! an atomic rename, so readers of the final path see either the previous
//! snapshot or the new one, never a torn write. Together with WAL
//! truncation this forms the engine's checkpoint.
//!
//! File layout (little-endian):
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ Magic        (12 bytes)  "COLEMAN_SNAP"               │
//! │ Version      (4 bytes)   Format version (currently 1) │
//! │ Table Count  (4 bytes)                                │
//! ├───────────────────────────────────────────────────────┤
//! │ Table                                                 │
//! │   Name       (u32 len + bytes)                        │
//! │   Schema     (u32 col_count + per-column name + type) │
//! │   Row Count  (8 bytes)                                │
//! │   Rows       (row_count x col_count encoded values)   │
//! ├───────────────────────────────────────────────────────┤
//! │ ... more tables ...                                   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Rows use the same value encoding as WAL records.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::core::{Error, Result};
use crate::storage::codec::{put_schema, put_str, put_value, Reader};
use crate::storage::table::Table;

/// Magic bytes at the start of every snapshot file
pub const SNAPSHOT_MAGIC: [u8; 12] = *b"COLEMAN_SNAP";

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Committed snapshot file name
pub const SNAPSHOT_FILE: &str = "snapshot.dat";

/// Transient file name used while writing
pub const SNAPSHOT_TMP_FILE: &str = "snapshot.tmp";

/// Snapshot store rooted at a directory
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at the given directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the committed snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    fn tmp_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_TMP_FILE)
    }

    /// True if a committed snapshot exists
    pub fn exists(&self) -> bool {
        self.snapshot_path().is_file()
    }

    /// Serialize all tables and commit the file atomically
    ///
    /// The dump is written to `snapshot.tmp` in the same directory, flushed
    /// and fsynced, then renamed over `snapshot.dat`, replacing any prior
    /// snapshot in one step. Tables are written in sorted-name order so
    /// identical states produce identical files.
    pub fn save(&self, tables: &FxHashMap<String, Table>) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let tmp_path = self.tmp_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(&SNAPSHOT_MAGIC)?;
        writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
        writer.write_all(&(tables.len() as u32).to_le_bytes())?;

        let mut names: Vec<&String> = tables.keys().collect();
        names.sort();

        for name in names {
            let table = &tables[name];
            let mut buf = Vec::new();
            put_str(&mut buf, name);
            put_schema(&mut buf, table.schema());
            buf.extend_from_slice(&(table.row_count() as u64).to_le_bytes());
            writer.write_all(&buf)?;

            let col_count = table.schema().column_count();
            for row in 0..table.row_count() {
                let mut row_buf = Vec::new();
                for col in 0..col_count {
                    // In-bounds by the row-length invariant.
                    let value = table.get_value(row, col).ok_or_else(|| {
                        Error::corrupt(format!("table '{}' has a short column", name))
                    })?;
                    put_value(&mut row_buf, &value);
                }
                writer.write_all(&row_buf)?;
            }
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&tmp_path, self.snapshot_path())?;
        sync_dir(&self.dir)?;
        Ok(())
    }

    /// Load the committed snapshot, delivering each table to `visit`
    ///
    /// Returns cleanly without invoking `visit` when no snapshot exists.
    pub fn load(&self, mut visit: impl FnMut(Table) -> Result<()>) -> Result<()> {
        let path = self.snapshot_path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if data.len() < 16 || data[..12] != SNAPSHOT_MAGIC {
            return Err(Error::InvalidSnapshotMagic);
        }
        let version = u32::from_le_bytes(data[12..16].try_into().unwrap());
        if version != SNAPSHOT_VERSION {
            return Err(Error::InvalidSnapshotVersion { version });
        }

        let mut reader = Reader::new(&data[16..]);
        let table_count = reader.read_u32("table count")? as usize;

        for _ in 0..table_count {
            let name = reader.read_str("table name")?;
            let schema = reader.read_schema()?;
            let row_count = reader.read_u64("row count")? as usize;
            let col_count = schema.column_count();

            let mut table = Table::new(name, schema);
            for _ in 0..row_count {
                let mut values = Vec::with_capacity(col_count);
                for _ in 0..col_count {
                    values.push(reader.read_value()?);
                }
                table.append_record(values)?;
            }
            visit(table)?;
        }

        Ok(())
    }
}

/// Fsync a directory so a rename inside it is durable
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}
