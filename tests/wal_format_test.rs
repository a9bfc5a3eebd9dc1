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

//! On-Disk Format Tests
//!
//! Byte-level checks of the WAL and snapshot formats. The layouts are
//! binding across implementations, so these tests assert literal bytes,
//! not just round-trips.

use coleman::{ColumnDef, ColumnType, Config, Schema, TableManager, Value, Wal, WalEntry};
use tempfile::tempdir;

// ============================================================================
// Binary format constants (must match wal.rs / snapshot.rs)
// ============================================================================

const WAL_MAGIC: &[u8; 12] = b"COLEMAN_WAL\0";
const SNAPSHOT_MAGIC: &[u8; 12] = b"COLEMAN_SNAP";
const FORMAT_VERSION: u32 = 1;
const WAL_HEADER_SIZE: usize = 16;
const RECORD_OVERHEAD: usize = 8 + 4 + 4;

// Entry tags
const TAG_CREATE_TABLE: u8 = 0x01;
const TAG_ADD_RECORD: u8 = 0x02;

// Value tags
const TAG_INT64: u8 = 1;
const TAG_FLOAT64: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_BOOL: u8 = 4;

fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap())
}

fn read_u64(data: &[u8], pos: usize) -> u64 {
    u64::from_le_bytes(data[pos..pos + 8].try_into().unwrap())
}

#[test]
fn test_wal_header_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("format.wal");
    let _wal = Wal::open(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), WAL_HEADER_SIZE);
    assert_eq!(&bytes[..12], WAL_MAGIC);
    assert_eq!(read_u32(&bytes, 12), FORMAT_VERSION);
}

#[test]
fn test_wal_record_framing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("format.wal");
    let wal = Wal::open(&path).unwrap();

    let entry = WalEntry::AddRecord {
        table_name: "t".to_string(),
        values: vec![Value::int64(7)],
    };
    wal.append(&entry).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let record = &bytes[WAL_HEADER_SIZE..];

    // seq | data_len | data | crc32(data)
    assert_eq!(read_u64(record, 0), 1);
    let data_len = read_u32(record, 8) as usize;
    let data = &record[12..12 + data_len];
    assert_eq!(data, entry.encode().as_slice());

    let stored_crc = read_u32(record, 12 + data_len);
    assert_eq!(stored_crc, crc32fast::hash(data));
    assert_eq!(record.len(), RECORD_OVERHEAD + data_len);
}

#[test]
fn test_create_table_entry_layout() {
    let schema = Schema::new(vec![
        ColumnDef::new("id", ColumnType::Int64),
        ColumnDef::new("name", ColumnType::String),
    ]);
    let entry = WalEntry::CreateTable {
        table_name: "users".to_string(),
        schema,
    };
    let data = entry.encode();

    let mut pos = 0;
    assert_eq!(data[pos], TAG_CREATE_TABLE);
    pos += 1;

    assert_eq!(read_u32(&data, pos), 5);
    pos += 4;
    assert_eq!(&data[pos..pos + 5], b"users");
    pos += 5;

    // Schema: column count, then name + type byte per column.
    assert_eq!(read_u32(&data, pos), 2);
    pos += 4;

    assert_eq!(read_u32(&data, pos), 2);
    pos += 4;
    assert_eq!(&data[pos..pos + 2], b"id");
    pos += 2;
    assert_eq!(data[pos], 0); // Int64 = 0
    pos += 1;

    assert_eq!(read_u32(&data, pos), 4);
    pos += 4;
    assert_eq!(&data[pos..pos + 4], b"name");
    pos += 4;
    assert_eq!(data[pos], 2); // String = 2
    pos += 1;

    assert_eq!(pos, data.len());
}

#[test]
fn test_add_record_entry_layout() {
    let entry = WalEntry::AddRecord {
        table_name: "t".to_string(),
        values: vec![
            Value::int64(-1),
            Value::float64(2.5),
            Value::string("hi"),
            Value::bool(true),
        ],
    };
    let data = entry.encode();

    let mut pos = 0;
    assert_eq!(data[pos], TAG_ADD_RECORD);
    pos += 1;

    assert_eq!(read_u32(&data, pos), 1);
    pos += 4;
    assert_eq!(data[pos], b't');
    pos += 1;

    assert_eq!(read_u32(&data, pos), 4);
    pos += 4;

    assert_eq!(data[pos], TAG_INT64);
    pos += 1;
    assert_eq!(
        i64::from_le_bytes(data[pos..pos + 8].try_into().unwrap()),
        -1
    );
    pos += 8;

    assert_eq!(data[pos], TAG_FLOAT64);
    pos += 1;
    assert_eq!(
        f64::from_le_bytes(data[pos..pos + 8].try_into().unwrap()),
        2.5
    );
    pos += 8;

    assert_eq!(data[pos], TAG_STRING);
    pos += 1;
    assert_eq!(read_u32(&data, pos), 2);
    pos += 4;
    assert_eq!(&data[pos..pos + 2], b"hi");
    pos += 2;

    assert_eq!(data[pos], TAG_BOOL);
    pos += 1;
    assert_eq!(data[pos], 1);
    pos += 1;

    assert_eq!(pos, data.len());
}

#[test]
fn test_entry_round_trip_with_every_type() {
    let schema = Schema::new(vec![
        ColumnDef::new("a", ColumnType::Int64),
        ColumnDef::new("b", ColumnType::Float64),
        ColumnDef::new("c", ColumnType::String),
        ColumnDef::new("d", ColumnType::Bool),
    ]);
    let entries = [
        WalEntry::CreateTable {
            table_name: "every".to_string(),
            schema,
        },
        WalEntry::AddRecord {
            table_name: "every".to_string(),
            values: vec![
                Value::int64(i64::MIN),
                Value::float64(-0.0),
                Value::string("naïve ünïcödé"),
                Value::bool(false),
            ],
        },
        WalEntry::AddRecord {
            table_name: "empty_values".to_string(),
            values: vec![],
        },
    ];

    for entry in entries {
        assert_eq!(WalEntry::decode(&entry.encode()).unwrap(), entry);
    }
}

#[test]
fn test_every_single_byte_mutation_is_detected() {
    // Flip each byte of one record's data payload in turn; the CRC must
    // catch all of them.
    let dir = tempdir().unwrap();
    let path = dir.path().join("format.wal");
    {
        let wal = Wal::open(&path).unwrap();
        wal.append(&WalEntry::AddRecord {
            table_name: "t".to_string(),
            values: vec![Value::int64(42), Value::string("x")],
        })
        .unwrap();
    }
    let pristine = std::fs::read(&path).unwrap();
    let data_len = read_u32(&pristine, WAL_HEADER_SIZE + 8) as usize;
    let data_start = WAL_HEADER_SIZE + 12;

    for offset in data_start..data_start + data_len {
        let mut bytes = pristine.clone();
        bytes[offset] ^= 0x55;
        std::fs::write(&path, &bytes).unwrap();

        let wal = Wal::open(&path).unwrap();
        let result = wal.replay(|_, _| Ok(()));
        assert_eq!(
            result,
            Err(coleman::Error::WalCorruption { seq: 1 }),
            "mutation at offset {} went undetected",
            offset
        );
    }
}

#[test]
fn test_snapshot_layout() {
    let dir = tempdir().unwrap();
    let config = Config::with_data_dir(dir.path()).with_snapshot_record_threshold(2);

    let manager = TableManager::open(config).unwrap();
    manager
        .create_table(
            "kv",
            Schema::new(vec![
                ColumnDef::new("k", ColumnType::String),
                ColumnDef::new("v", ColumnType::Int64),
            ]),
        )
        .unwrap();
    manager
        .add_record("kv", vec![Value::string("a"), Value::int64(1)])
        .unwrap();

    let bytes = std::fs::read(dir.path().join("snapshots").join("snapshot.dat")).unwrap();

    let mut pos = 0;
    assert_eq!(&bytes[..12], SNAPSHOT_MAGIC);
    pos += 12;
    assert_eq!(read_u32(&bytes, pos), FORMAT_VERSION);
    pos += 4;
    assert_eq!(read_u32(&bytes, pos), 1); // table count
    pos += 4;

    // Table name
    assert_eq!(read_u32(&bytes, pos), 2);
    pos += 4;
    assert_eq!(&bytes[pos..pos + 2], b"kv");
    pos += 2;

    // Schema
    assert_eq!(read_u32(&bytes, pos), 2);
    pos += 4;
    assert_eq!(read_u32(&bytes, pos), 1);
    pos += 4;
    assert_eq!(bytes[pos], b'k');
    pos += 1;
    assert_eq!(bytes[pos], 2); // String = 2
    pos += 1;
    assert_eq!(read_u32(&bytes, pos), 1);
    pos += 4;
    assert_eq!(bytes[pos], b'v');
    pos += 1;
    assert_eq!(bytes[pos], 0); // Int64 = 0
    pos += 1;

    // Row count
    assert_eq!(read_u64(&bytes, pos), 1);
    pos += 8;

    // Row: string "a" then int64 1, in the WAL value encoding.
    assert_eq!(bytes[pos], TAG_STRING);
    pos += 1;
    assert_eq!(read_u32(&bytes, pos), 1);
    pos += 4;
    assert_eq!(bytes[pos], b'a');
    pos += 1;
    assert_eq!(bytes[pos], TAG_INT64);
    pos += 1;
    assert_eq!(
        i64::from_le_bytes(bytes[pos..pos + 8].try_into().unwrap()),
        1
    );
    pos += 8;

    assert_eq!(pos, bytes.len());
}
