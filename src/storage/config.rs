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

//! Engine configuration
//!

use std::path::{Path, PathBuf};

/// Configuration options for the engine
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the write-ahead log file
    /// Default: data/coleman.wal
    pub wal_path: PathBuf,

    /// Directory holding snapshot.dat / snapshot.tmp
    /// Default: data/snapshots
    pub snapshot_dir: PathBuf,

    /// Number of logged mutations that triggers a snapshot
    /// Default: 10_000
    pub snapshot_record_threshold: u64,

    /// WAL size in bytes that also triggers a snapshot
    /// Default: 10 MiB
    pub snapshot_wal_size_threshold: u64,

    /// Listen host, consumed by the external adapter only
    /// Default: 127.0.0.1
    pub host: String,

    /// Listen port, consumed by the external adapter only
    /// Default: 4650
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wal_path: PathBuf::from("data/coleman.wal"),
            snapshot_dir: PathBuf::from("data/snapshots"),
            snapshot_record_threshold: 10_000,
            snapshot_wal_size_threshold: 10 * 1024 * 1024, // 10 MiB
            host: "127.0.0.1".to_string(),
            port: 4650,
        }
    }
}

impl Config {
    /// Creates a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Config with the WAL and snapshots rooted under one directory
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            wal_path: dir.join("coleman.wal"),
            snapshot_dir: dir.join("snapshots"),
            ..Default::default()
        }
    }

    /// Builder method to set the WAL path
    pub fn with_wal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.wal_path = path.into();
        self
    }

    /// Builder method to set the snapshot directory
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    /// Builder method to set the record-count snapshot threshold
    pub fn with_snapshot_record_threshold(mut self, records: u64) -> Self {
        self.snapshot_record_threshold = records;
        self
    }

    /// Builder method to set the WAL-size snapshot threshold
    pub fn with_snapshot_wal_size_threshold(mut self, bytes: u64) -> Self {
        self.snapshot_wal_size_threshold = bytes;
        self
    }

    /// Builder method to set the adapter host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Builder method to set the adapter port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
